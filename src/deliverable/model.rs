//! Deliverable file schema
//!
//! Mirrors the YAML layout of `deliverables/<series>/<name>.yaml`. Keys are
//! kebab-case and unknown keys are rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::version::Version;

/// Release model of a deliverable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseModel {
    /// Milestones, release candidates and a final release
    CycleWithRc,
    /// Any number of releases during the cycle
    CycleWithIntermediary,
    /// Releases trail the main cycle deadline
    CycleTrailing,
    /// Released automatically at the end of the cycle
    CycleAutomatic,
    /// Not tied to the cycle
    Independent,
    /// Branched but never tagged
    Untagged,
}

impl ReleaseModel {
    /// The kebab-case name used in YAML
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CycleWithRc => "cycle-with-rc",
            Self::CycleWithIntermediary => "cycle-with-intermediary",
            Self::CycleTrailing => "cycle-trailing",
            Self::CycleAutomatic => "cycle-automatic",
            Self::Independent => "independent",
            Self::Untagged => "untagged",
        }
    }
}

/// Bug tracker identity of the project
///
/// Storyboard ids are numeric in practice while launchpad names are
/// strings, so either form is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TrackerId {
    /// Numeric project id
    Number(u64),
    /// Project name
    Name(String),
}

impl std::fmt::Display for TrackerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// Packaging settings for one repository
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RepositorySettings {
    /// Base name of published tarballs when it differs from the repo name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_base: Option<String>,
    /// Free-form flags such as `retired`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

/// One repository pinned by a release
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectRef {
    /// Repository identifier, e.g. `openstack/oslo.config`
    pub repo: String,
    /// Commit hash being tagged
    pub hash: String,
    /// Per-release tarball base override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_base: Option<String>,
}

/// A published version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReleaseEntry {
    /// Version being released
    pub version: Version,
    /// Repositories and the commits they are tagged at
    #[serde(default)]
    pub projects: Vec<ProjectRef>,
}

impl ReleaseEntry {
    /// Hash used for `repo` in this release
    #[must_use]
    pub fn hash_for(&self, repo: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.repo == repo)
            .map(|p| p.hash.as_str())
    }
}

/// Where a branch was cut
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BranchLocation {
    /// Cut at a released version
    Version(Version),
    /// Cut at explicit commits, keyed by repository
    Commits(BTreeMap<String, String>),
}

/// A branch created from the deliverable's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BranchEntry {
    /// Full branch name such as `stable/rocky`
    pub name: String,
    /// Cut point
    pub location: BranchLocation,
}

impl BranchEntry {
    /// Prefix before the first `/`, if any
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once('/').map(|(prefix, _)| prefix)
    }

    /// Part after the first `/`, if any
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.name.split_once('/').map(|(_, suffix)| suffix)
    }
}

/// Link to published release notes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ReleaseNotes {
    /// One page for the whole deliverable
    Single(String),
    /// One page per repository
    PerRepo(BTreeMap<String, String>),
}

/// Raw contents of a deliverable file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeliverableFile {
    /// Launchpad project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launchpad: Option<TrackerId>,
    /// Storyboard project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard: Option<TrackerId>,
    /// Owning team
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Type classification such as `library` or `tempest-plugin`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Release model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_model: Option<ReleaseModel>,
    /// Mailing list for release announcements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_announcements_to: Option<String>,
    /// Whether announcements link to the package index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_pypi_link: Option<bool>,
    /// How published artifacts are linked (`tarball` or `none`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_link_mode: Option<String>,
    /// `std` (default) or `tagless`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_branch_type: Option<String>,
    /// Per-repository packaging settings
    #[serde(default)]
    pub repository_settings: BTreeMap<String, RepositorySettings>,
    /// Free-text highlights for the cycle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycle_highlights: Vec<String>,
    /// Releases in authored order
    #[serde(default)]
    pub releases: Vec<ReleaseEntry>,
    /// Branches in authored order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchEntry>,
    /// Release notes link(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,
}
