//! Deliverable metadata documents
//!
//! A deliverable describes one project's releases within a series. Parsing
//! fails fast on structural problems; softer consistency rules live in
//! [`crate::validate`].

pub mod model;
pub mod version;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub use model::{
    BranchEntry, BranchLocation, DeliverableFile, ProjectRef, ReleaseEntry, ReleaseModel,
    ReleaseNotes, RepositorySettings, TrackerId,
};
pub use version::Version;

/// Series name used by deliverables that are not tied to a release cycle
pub const INDEPENDENT: &str = "independent";

impl DeliverableFile {
    /// Deserialize deliverable YAML without structural checks
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse deliverable YAML")
    }
}

/// A parsed deliverable together with its series and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliverable {
    series: String,
    name: String,
    file: DeliverableFile,
    path: Option<PathBuf>,
}

impl Deliverable {
    /// Load `deliverables/<series>/<name>.yaml`, taking series and name
    /// from the path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Cannot derive deliverable name from {}", path.display()))?;
        let series = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .with_context(|| format!("Cannot derive series from {}", path.display()))?;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deliverable file: {}", path.display()))?;
        let mut deliverable = Self::parse(series, name, &content)
            .with_context(|| format!("Invalid deliverable file: {}", path.display()))?;
        deliverable.path = Some(path.to_path_buf());
        Ok(deliverable)
    }

    /// Parse deliverable YAML and check its structure
    pub fn parse(series: &str, name: &str, content: &str) -> Result<Self> {
        let file = DeliverableFile::parse(content)?;
        Self::from_file(series, name, file)
    }

    /// Wrap already-deserialized contents, checking their structure
    pub fn from_file(series: &str, name: &str, file: DeliverableFile) -> Result<Self> {
        let deliverable = Self {
            series: series.to_string(),
            name: name.to_string(),
            file,
            path: None,
        };
        deliverable.check_structure()?;
        Ok(deliverable)
    }

    fn check_structure(&self) -> Result<()> {
        if self.file.launchpad.is_none() && self.file.storyboard.is_none() {
            bail!(
                "Deliverable '{}' has no project identity: set 'launchpad' or 'storyboard'",
                self.name
            );
        }

        if self.file.releases.is_empty() {
            bail!("Deliverable '{}' has no release entries", self.name);
        }

        let known = &self.file.repository_settings;
        for release in &self.file.releases {
            if release.version.as_str().trim().is_empty() {
                bail!("Deliverable '{}' has a release with an empty version", self.name);
            }
            if release.projects.is_empty() {
                bail!(
                    "Release {} of '{}' lists no projects",
                    release.version,
                    self.name
                );
            }
            if known.is_empty() {
                continue;
            }
            for project in &release.projects {
                if !known.contains_key(&project.repo) {
                    bail!(
                        "Release {} of '{}' references repository '{}' which is not in repository-settings",
                        release.version,
                        self.name,
                        project.repo
                    );
                }
            }
        }

        Ok(())
    }

    /// Series this deliverable belongs to
    #[must_use]
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Deliverable name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the deliverable was loaded from, if it came from disk
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw file contents
    #[must_use]
    pub const fn file(&self) -> &DeliverableFile {
        &self.file
    }

    /// Whether the deliverable lives outside the release cycle
    #[must_use]
    pub fn is_independent(&self) -> bool {
        self.series == INDEPENDENT
    }

    /// Declared release model
    #[must_use]
    pub const fn release_model(&self) -> Option<ReleaseModel> {
        self.file.release_model
    }

    /// Declared stable branch type, `std` when unset
    #[must_use]
    pub fn stable_branch_type(&self) -> &str {
        self.file.stable_branch_type.as_deref().unwrap_or("std")
    }

    /// Type classification, if any
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.file.kind.as_deref()
    }

    /// Owning team, if any
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.file.team.as_deref()
    }

    /// Releases in authored order
    #[must_use]
    pub fn releases(&self) -> &[ReleaseEntry] {
        &self.file.releases
    }

    /// Branches in authored order
    #[must_use]
    pub fn branches(&self) -> &[BranchEntry] {
        &self.file.branches
    }

    /// Last listed release
    #[must_use]
    pub fn latest_release(&self) -> Option<&ReleaseEntry> {
        self.file.releases.last()
    }

    /// Find a release by exact version
    #[must_use]
    pub fn find_release(&self, version: &str) -> Option<&ReleaseEntry> {
        self.file.releases.iter().find(|r| r.version == version)
    }

    /// Repositories named in `repository-settings`, or in the releases when
    /// no settings are given.
    #[must_use]
    pub fn known_repos(&self) -> BTreeSet<&str> {
        if !self.file.repository_settings.is_empty() {
            return self
                .file
                .repository_settings
                .keys()
                .map(String::as_str)
                .collect();
        }
        self.file
            .releases
            .iter()
            .flat_map(|r| r.projects.iter().map(|p| p.repo.as_str()))
            .collect()
    }

    /// Release notes URL for a repository
    #[must_use]
    pub fn release_notes_for(&self, repo: &str) -> Option<&str> {
        match self.file.release_notes.as_ref()? {
            ReleaseNotes::Single(url) => Some(url.as_str()),
            ReleaseNotes::PerRepo(map) => map.get(repo).map(String::as_str),
        }
    }

    /// Tarball base name for a repository, falling back to the last path
    /// segment of the repository identifier.
    #[must_use]
    pub fn tarball_base<'a>(&'a self, repo: &'a str) -> &'a str {
        self.file
            .repository_settings
            .get(repo)
            .and_then(|s| s.tarball_base.as_deref())
            .unwrap_or_else(|| repo.rsplit('/').next().unwrap_or(repo))
    }
}
