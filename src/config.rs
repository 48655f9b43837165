//! Tool configuration parser
//!
//! Parses `relcycle.toml` into the series and team lists used by the
//! deliverable checks. A missing file yields the defaults.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Release series known to the tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// The series currently under development
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    /// All series names that stable branches may refer to
    #[serde(default)]
    pub known: Vec<String>,
}

/// Settings for deliverable checks
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Recognised team names; empty disables the team check
    #[serde(default)]
    pub teams: Vec<String>,
}

/// Top-level configuration parsed from relcycle.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Series configuration
    #[serde(default)]
    pub series: SeriesConfig,
    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl ToolConfig {
    /// Parse a relcycle.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from a path, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Parse relcycle.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse relcycle.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Whether `series` is listed in `series.known`
    #[must_use]
    pub fn is_known_series(&self, series: &str) -> bool {
        self.series.known.iter().any(|s| s == series)
    }

    /// Whether `team` is recognised. Always true when no teams are configured.
    #[must_use]
    pub fn is_known_team(&self, team: &str) -> bool {
        self.validation.teams.is_empty()
            || self
                .validation
                .teams
                .iter()
                .any(|t| t.eq_ignore_ascii_case(team))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for series in &self.series.known {
            if series.trim().is_empty() {
                bail!("Series name cannot be empty");
            }
            if !seen.insert(series.as_str()) {
                bail!("Duplicate series name: '{series}'");
            }
        }

        if let Some(current) = &self.series.current {
            if !self.series.known.is_empty() && !seen.contains(current.as_str()) {
                bail!("Current series '{current}' is not in the known series list");
            }
        }

        Ok(())
    }
}
