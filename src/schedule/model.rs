//! Schedule data model and YAML loading
//!
//! A schedule file describes a release cycle as an ordered list of weeks.
//! Weeks may carry explicit dates or have them derived from `start-week`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single week of a release cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    /// First day of the week
    pub start: NaiveDate,
    /// Last day of the week
    pub end: NaiveDate,
    /// Display name such as `R-1`; empty for unnamed pre-cycle weeks
    pub name: String,
    /// Cross-project event references
    pub x_project: Vec<String>,
    /// Project-specific event references
    pub project: Vec<String>,
}

impl Week {
    /// Create an unnamed week with no events
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            name: String::new(),
            x_project: Vec::new(),
            project: Vec::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the cross-project event references
    #[must_use]
    pub fn with_x_project<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.x_project = events.into_iter().map(Into::into).collect();
        self
    }

    /// Set the project-specific event references
    #[must_use]
    pub fn with_project<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project = events.into_iter().map(Into::into).collect();
        self
    }
}

/// An ordered sequence of weeks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cycle {
    weeks: Vec<Week>,
}

impl Cycle {
    /// Build a cycle from weeks, preserving their order
    #[must_use]
    pub const fn new(weeks: Vec<Week>) -> Self {
        Self { weeks }
    }

    /// Weeks in input order
    #[must_use]
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Number of weeks
    #[must_use]
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Whether the cycle has no weeks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// One week as written in a schedule file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WeekSpec {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Explicit start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Explicit end date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Cross-project event references
    #[serde(default)]
    pub x_project: Vec<String>,
    /// Project-specific event references
    #[serde(default)]
    pub project: Vec<String>,
}

/// Top-level schedule file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScheduleFile {
    /// Start of the first week, used for weeks without an explicit start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_week: Option<NaiveDate>,
    /// Week definitions in display order
    pub cycle: Vec<WeekSpec>,
}

impl ScheduleFile {
    /// Read and parse a schedule file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid schedule file: {}", path.display()))
    }

    /// Parse schedule YAML content
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse schedule YAML")
    }

    /// Resolve dates and produce the `Cycle`.
    ///
    /// A week without `start` begins `7 * index` days after `start-week`.
    /// A week without `end` ends six days after its start. Explicit dates
    /// are taken as written.
    pub fn into_cycle(self) -> Result<Cycle> {
        let mut weeks = Vec::with_capacity(self.cycle.len());

        for (index, spec) in self.cycle.into_iter().enumerate() {
            let start = match (spec.start, self.start_week) {
                (Some(start), _) => start,
                (None, Some(first)) => {
                    let offset = u64::try_from(index)? * 7;
                    first
                        .checked_add_days(Days::new(offset))
                        .with_context(|| format!("Date overflow deriving start of week {index}"))?
                }
                (None, None) => bail!(
                    "Week {index} ('{}') has no start date and the schedule has no start-week",
                    spec.name
                ),
            };
            let end = match spec.end {
                Some(end) => end,
                None => start
                    .checked_add_days(Days::new(6))
                    .with_context(|| format!("Date overflow deriving end of week {index}"))?,
            };

            weeks.push(Week {
                start,
                end,
                name: spec.name,
                x_project: spec.x_project,
                project: spec.project,
            });
        }

        Ok(Cycle::new(weeks))
    }
}
