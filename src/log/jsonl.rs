//! JSONL (JSON Lines) report of validation runs
//!
//! Appends one line per checked deliverable to `<dir>/validate.jsonl`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::deliverable::Deliverable;
use crate::validate::ValidationContext;

/// File name of the report inside the report directory
pub const REPORT_FILE: &str = "validate.jsonl";

/// Result of validating a single deliverable file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// When the check finished
    pub timestamp: DateTime<Utc>,
    /// Path of the checked file as given on the command line
    pub file: String,
    /// Series of the deliverable, if the file could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Name of the deliverable, if the file could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Error messages, prefixed with their check code
    pub errors: Vec<String>,
    /// Warning messages, prefixed with their check code
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// Build an outcome from the findings for a parsed deliverable
    #[must_use]
    pub fn from_context(file: &str, deliv: &Deliverable, ctx: &ValidationContext) -> Self {
        Self {
            timestamp: Utc::now(),
            file: file.to_string(),
            series: Some(deliv.series().to_string()),
            name: Some(deliv.name().to_string()),
            errors: ctx
                .errors()
                .map(|f| format!("{}: {}", f.code, f.message))
                .collect(),
            warnings: ctx
                .warnings()
                .map(|f| format!("{}: {}", f.code, f.message))
                .collect(),
        }
    }

    /// Build an outcome for a file that failed to load
    #[must_use]
    pub fn load_failure(file: &str, error: &anyhow::Error) -> Self {
        Self {
            timestamp: Utc::now(),
            file: file.to_string(),
            series: None,
            name: None,
            errors: vec![format!("{error:#}")],
            warnings: vec![],
        }
    }

    /// Whether the file passed without errors
    #[must_use]
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Append-only JSONL writer for validation outcomes
pub struct ReportLogger {
    log_path: PathBuf,
}

impl ReportLogger {
    /// Create a logger writing into `log_dir`, creating the directory
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create report directory: {}", log_dir.display()))?;

        Ok(Self {
            log_path: log_dir.join(REPORT_FILE),
        })
    }

    /// Append one outcome as a JSON line
    pub fn append(&self, outcome: &ValidationOutcome) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open report file: {}", self.log_path.display()))?;

        let json = serde_json::to_string(outcome)
            .context("Failed to serialize validation outcome to JSON")?;

        writeln!(file, "{json}").context("Failed to write to report file")?;

        Ok(())
    }

    /// Read every outcome in the order written. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<ValidationOutcome>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read report file: {}", self.log_path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))
            })
            .collect()
    }

    /// Path to the report file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::testutil::SAMPLE_DELIVERABLE;
    use crate::validate::validate_deliverable;
    use tempfile::TempDir;

    fn sample_outcome() -> ValidationOutcome {
        let deliv = Deliverable::parse("rocky", "oslo.config", SAMPLE_DELIVERABLE).unwrap();
        let mut ctx = validate_deliverable(&deliv, &ToolConfig::default());
        ctx.error("V999", "synthetic");
        ValidationOutcome::from_context("deliverables/rocky/oslo.config.yaml", &deliv, &ctx)
    }

    #[test]
    fn test_new_logger_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("reports");

        let logger = ReportLogger::new(&log_dir).unwrap();

        assert!(log_dir.exists());
        assert_eq!(logger.log_path(), log_dir.join(REPORT_FILE));
    }

    #[test]
    fn test_outcome_from_context_prefixes_codes() {
        let outcome = sample_outcome();
        assert_eq!(outcome.series.as_deref(), Some("rocky"));
        assert_eq!(outcome.name.as_deref(), Some("oslo.config"));
        assert_eq!(outcome.errors, vec!["V999: synthetic"]);
        assert!(!outcome.passed());
    }

    #[test]
    fn test_load_failure_outcome() {
        let err = anyhow::anyhow!("inner").context("outer");
        let outcome = ValidationOutcome::load_failure("x.yaml", &err);
        assert_eq!(outcome.errors, vec!["outer: inner"]);
        assert!(outcome.name.is_none());
    }

    #[test]
    fn test_append_and_read_back_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ReportLogger::new(temp_dir.path()).unwrap();

        let first = sample_outcome();
        let second = ValidationOutcome::load_failure("broken.yaml", &anyhow::anyhow!("bad"));
        logger.append(&first).unwrap();
        logger.append(&second).unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert_eq!(content.lines().count(), 2);

        let entries = logger.read_all().unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn test_read_all_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ReportLogger::new(temp_dir.path()).unwrap();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ReportLogger::new(temp_dir.path()).unwrap();
        logger.append(&sample_outcome()).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(logger.log_path())
            .unwrap();
        writeln!(file, "   ").unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_read_all_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ReportLogger::new(temp_dir.path()).unwrap();
        fs::write(logger.log_path(), "{not json}\n").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
