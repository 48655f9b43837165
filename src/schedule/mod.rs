//! Release schedule
//!
//! Loads a cycle of weeks from YAML and renders it as an RST table.

pub mod model;
pub mod render;

pub use model::{Cycle, ScheduleFile, Week, WeekSpec};
pub use render::{iso_date, render_schedule, render_schedule_default, render_table};
