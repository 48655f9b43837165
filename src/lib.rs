//! relcycle - release cycle tooling
//!
//! Renders release schedules as reStructuredText tables and parses and
//! checks deliverable metadata files describing a project's releases.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod deliverable;
pub mod log;
pub mod schedule;
pub mod validate;

#[cfg(test)]
pub mod testutil;

// Re-export commonly used types
pub use config::ToolConfig;
pub use deliverable::{Deliverable, DeliverableFile, ReleaseEntry, Version};
pub use log::{ReportLogger, ValidationOutcome};
pub use schedule::{render_schedule, render_schedule_default, Cycle, ScheduleFile, Week};
pub use validate::{validate_deliverable, Finding, Severity, ValidationContext};
