//! Deliverable consistency checks
//!
//! Runs offline checks over a parsed [`Deliverable`] and collects the
//! results as findings. Findings are data: only I/O and parse failures are
//! reported as `Err`. Each finding carries a short code (e.g. "V006") so
//! reports can be filtered and grepped.

pub mod checks;

use crate::config::ToolConfig;
use crate::deliverable::Deliverable;

/// Severity level for a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Must fix before release
    Error,
    /// Should fix
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Severity of the finding
    pub severity: Severity,
    /// Short code identifying the check
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Findings collected while checking one deliverable
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    findings: Vec<Finding>,
}

impl ValidationContext {
    /// Create an empty context
    #[must_use]
    pub const fn new() -> Self {
        Self {
            findings: Vec::new(),
        }
    }

    /// Record an error
    pub fn error(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(code, %message, "validation error");
        self.findings.push(Finding {
            severity: Severity::Error,
            code,
            message,
        });
    }

    /// Record a warning
    pub fn warning(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(code, %message, "validation warning");
        self.findings.push(Finding {
            severity: Severity::Warning,
            code,
            message,
        });
    }

    /// All findings in the order they were recorded
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings of error severity
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    /// Findings of warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Number of errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Returns true if there are no findings at all
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Run every check against `deliv` and return the collected findings.
#[must_use]
pub fn validate_deliverable(deliv: &Deliverable, config: &ToolConfig) -> ValidationContext {
    let mut ctx = ValidationContext::new();
    for (name, check) in checks::ALL {
        tracing::debug!(deliverable = deliv.name(), check = name, "running check");
        check(deliv, config, &mut ctx);
    }
    ctx
}
