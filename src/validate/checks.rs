//! Individual deliverable checks
//!
//! Each check inspects one aspect of a deliverable and records findings in
//! the context. Checks never fail; they only report.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::config::ToolConfig;
use crate::deliverable::{
    BranchEntry, BranchLocation, Deliverable, DeliverableFile, ReleaseModel, ReleaseNotes,
    INDEPENDENT,
};

use super::ValidationContext;

/// Signature shared by all checks
pub type Check = fn(&Deliverable, &ToolConfig, &mut ValidationContext);

/// Every check, in the order they run
pub const ALL: &[(&str, Check)] = &[
    ("bugtracker", check_bugtracker),
    ("team", check_team),
    ("announcements", check_announcements),
    ("release-notes", check_release_notes),
    ("model", check_model),
    ("release-hashes", check_release_hashes),
    ("version-numbers", check_version_numbers),
    ("duplicate-versions", check_duplicate_versions),
    ("branch-prefixes", check_branch_prefixes),
    ("stable-branches", check_stable_branches),
    ("feature-branches", check_feature_branches),
    ("driverfixes-branches", check_driverfixes_branches),
    ("series-final", check_series_final),
    ("series-first", check_series_first),
    ("series-open", check_series_open),
];

/// Branch name prefixes that may appear in `branches`
pub const VALID_BRANCH_PREFIXES: &[&str] = &["stable", "feature", "driverfixes", "unmaintained"];

/// Whether `val` looks like a full commit hash
#[must_use]
pub fn is_a_hash(val: &str) -> bool {
    val.len() == 40 && val.chars().all(|c| c.is_ascii_hexdigit())
}

/// V001: exactly one bug tracker
pub fn check_bugtracker(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    let file = deliv.file();
    match (&file.launchpad, &file.storyboard) {
        (Some(lp), Some(sb)) => ctx.error(
            "V001",
            format!("Both launchpad ({lp}) and storyboard ({sb}) are set; use only one"),
        ),
        (None, None) => ctx.error("V001", "No launchpad or storyboard project given"),
        _ => {}
    }
}

/// V002: team is recognised
pub fn check_team(deliv: &Deliverable, config: &ToolConfig, ctx: &mut ValidationContext) {
    match deliv.team() {
        None => ctx.warning("V002", "No team given"),
        Some(team) if !config.is_known_team(team) => {
            ctx.warning("V002", format!("Team '{team}' is not a known team"));
        }
        Some(_) => {}
    }
}

/// V003: announcement address has no spaces
pub fn check_announcements(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    if let Some(addr) = &deliv.file().send_announcements_to {
        if addr.contains(char::is_whitespace) {
            ctx.error("V003", format!("Space in send-announcements-to ({addr:?})"));
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// V004: release notes links are URLs for known repositories
pub fn check_release_notes(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    match &deliv.file().release_notes {
        None => {}
        Some(ReleaseNotes::Single(url)) => {
            if !is_http_url(url) {
                ctx.error("V004", format!("Release notes link {url:?} is not an http(s) URL"));
            }
        }
        Some(ReleaseNotes::PerRepo(links)) => {
            let known = deliv.known_repos();
            for (repo, url) in links {
                if !known.contains(repo.as_str()) {
                    ctx.error(
                        "V004",
                        format!("Release notes for unknown repository {repo}"),
                    );
                }
                if !is_http_url(url) {
                    ctx.error(
                        "V004",
                        format!("Release notes link {url:?} for {repo} is not an http(s) URL"),
                    );
                }
            }
        }
    }
}

/// V005: release model agrees with the series
pub fn check_model(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    let model = deliv.release_model();

    if deliv.is_independent() {
        if let Some(model) = model.filter(|m| *m != ReleaseModel::Independent) {
            ctx.error(
                "V005",
                format!(
                    "Deliverables in the independent series must use release-model 'independent', not '{}'",
                    model.as_str()
                ),
            );
        }
    } else {
        match model {
            None => ctx.error("V005", "No release-model specified"),
            Some(ReleaseModel::Independent) => ctx.error(
                "V005",
                format!(
                    "Release-model 'independent' is only valid in the independent series, not '{}'",
                    deliv.series()
                ),
            ),
            Some(_) => {}
        }
    }

    // Loading requires at least one release, so an untagged deliverable can
    // never pass; point at the tagged models instead.
    if model == Some(ReleaseModel::Untagged) && !deliv.releases().is_empty() {
        ctx.error(
            "V005",
            "Untagged deliverables must not list releases; a deliverable with releases needs a tagged release-model",
        );
    }
}

/// V006: release hashes look like commit hashes
pub fn check_release_hashes(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    for release in deliv.releases() {
        for project in &release.projects {
            if !is_a_hash(&project.hash) {
                ctx.error(
                    "V006",
                    format!(
                        "{} version {} release from {:?}, which is not a hash",
                        project.repo, release.version, project.hash
                    ),
                );
            }
        }
    }
}

/// V007: versions use the accepted format
pub fn check_version_numbers(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    for release in deliv.releases() {
        if !release.version.is_well_formed() {
            ctx.error(
                "V007",
                format!("Version {:?} is not a valid version number", release.version.as_str()),
            );
        }
    }
}

/// V008: each version is listed once
pub fn check_duplicate_versions(
    deliv: &Deliverable,
    _config: &ToolConfig,
    ctx: &mut ValidationContext,
) {
    let mut seen = HashSet::new();
    for release in deliv.releases() {
        if !seen.insert(release.version.as_str()) {
            ctx.error("V008", format!("Version {} is listed more than once", release.version));
        }
    }
}

/// V009: branch names use a known prefix
pub fn check_branch_prefixes(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    for branch in deliv.branches() {
        let valid = branch
            .prefix()
            .is_some_and(|p| VALID_BRANCH_PREFIXES.contains(&p));
        if !valid {
            ctx.error(
                "V009",
                format!(
                    "Branch {:?} does not start with a valid prefix ({})",
                    branch.name,
                    VALID_BRANCH_PREFIXES.join(", ")
                ),
            );
        }
    }
}

fn branches_with_prefix<'a>(
    deliv: &'a Deliverable,
    prefix: &'a str,
) -> impl Iterator<Item = &'a BranchEntry> {
    deliv
        .branches()
        .iter()
        .filter(move |b| b.prefix() == Some(prefix))
}

/// Report `branch` if the deliverable is a tempest plugin, which never
/// branches. Returns whether it was reported.
fn reject_tempest_plugin_branch(
    deliv: &Deliverable,
    branch: &BranchEntry,
    code: &'static str,
    ctx: &mut ValidationContext,
) -> bool {
    if deliv.kind() != Some("tempest-plugin") {
        return false;
    }
    ctx.error(
        code,
        format!("Tempest plugins do not have branches, found {}", branch.name),
    );
    true
}

/// Check a repo→hash location, reporting under `code`.
fn check_commit_location(
    deliv: &Deliverable,
    branch: &BranchEntry,
    commits: &BTreeMap<String, String>,
    code: &'static str,
    ctx: &mut ValidationContext,
) {
    let known = deliv.known_repos();
    for (repo, hash) in commits {
        if !known.contains(repo.as_str()) {
            ctx.error(
                code,
                format!("Branch {} refers to unknown repository {repo}", branch.name),
            );
        }
        if !is_a_hash(hash) {
            ctx.error(
                code,
                format!(
                    "Branch {} location for {repo} is {hash:?}, which is not a hash",
                    branch.name
                ),
            );
        }
    }
}

/// V010: stable branches are named for their series and cut at a known point
pub fn check_stable_branches(deliv: &Deliverable, config: &ToolConfig, ctx: &mut ValidationContext) {
    for branch in branches_with_prefix(deliv, "stable") {
        if reject_tempest_plugin_branch(deliv, branch, "V010", ctx) {
            continue;
        }

        let series = branch.suffix().unwrap_or_default();
        if deliv.is_independent() {
            if !config.series.known.is_empty() && !config.is_known_series(series) {
                ctx.error(
                    "V010",
                    format!("Stable branch {} does not refer to a known series", branch.name),
                );
            }
        } else if series != deliv.series() {
            ctx.error(
                "V010",
                format!(
                    "Cycle-based deliverable in {} has stable branch {} for another series",
                    deliv.series(),
                    branch.name
                ),
            );
        }

        match (deliv.stable_branch_type(), &branch.location) {
            ("std", BranchLocation::Version(version)) => {
                if deliv.find_release(version.as_str()).is_none() {
                    ctx.error(
                        "V010",
                        format!(
                            "Branch {} is cut at version {version}, which is not a listed release",
                            branch.name
                        ),
                    );
                }
            }
            ("std", BranchLocation::Commits(_)) => ctx.error(
                "V010",
                format!(
                    "Branch {} location must be a release version for stable-branch-type std",
                    branch.name
                ),
            ),
            ("tagless", BranchLocation::Commits(commits)) => {
                check_commit_location(deliv, branch, commits, "V010", ctx);
            }
            ("tagless", BranchLocation::Version(_)) => ctx.error(
                "V010",
                format!(
                    "Branch {} location must map repositories to commits for stable-branch-type tagless",
                    branch.name
                ),
            ),
            (other, _) => ctx.error(
                "V010",
                format!("Unknown stable-branch-type {other:?}"),
            ),
        }
    }
}

/// V011: feature branches are cut at explicit commits
pub fn check_feature_branches(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    for branch in branches_with_prefix(deliv, "feature") {
        if reject_tempest_plugin_branch(deliv, branch, "V011", ctx) {
            continue;
        }
        match &branch.location {
            BranchLocation::Commits(commits) => {
                check_commit_location(deliv, branch, commits, "V011", ctx);
            }
            BranchLocation::Version(_) => ctx.error(
                "V011",
                format!(
                    "Feature branch {} location must map repositories to commits",
                    branch.name
                ),
            ),
        }
    }
}

/// V012: driverfixes branches name a known series and explicit commits
pub fn check_driverfixes_branches(
    deliv: &Deliverable,
    config: &ToolConfig,
    ctx: &mut ValidationContext,
) {
    for branch in branches_with_prefix(deliv, "driverfixes") {
        if reject_tempest_plugin_branch(deliv, branch, "V012", ctx) {
            continue;
        }
        let series = branch.suffix().unwrap_or_default();
        if !config.series.known.is_empty() && !config.is_known_series(series) {
            ctx.error(
                "V012",
                format!("Driverfixes branch {} does not refer to a known series", branch.name),
            );
        }
        match &branch.location {
            BranchLocation::Commits(commits) => {
                check_commit_location(deliv, branch, commits, "V012", ctx);
            }
            BranchLocation::Version(_) => ctx.error(
                "V012",
                format!(
                    "Driverfixes branch {} location must map repositories to commits",
                    branch.name
                ),
            ),
        }
    }
}

/// V013: a final release reuses the commits of its last candidate
pub fn check_series_final(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    let Some((latest, earlier)) = deliv.releases().split_last() else {
        return;
    };
    if latest.version.is_prerelease() {
        return;
    }

    let Some(last_candidate) = earlier
        .iter()
        .rev()
        .find(|r| r.version.is_prerelease() && r.version.final_version() == latest.version)
    else {
        return;
    };

    for project in &latest.projects {
        match last_candidate.hash_for(&project.repo) {
            Some(hash) if hash == project.hash => {}
            Some(hash) => ctx.error(
                "V013",
                format!(
                    "Final release {} of {} is on {} but the last candidate {} is on {hash}",
                    latest.version, project.repo, project.hash, last_candidate.version
                ),
            ),
            None => ctx.error(
                "V013",
                format!(
                    "Final release {} includes {} which is not in candidate {}",
                    latest.version, project.repo, last_candidate.version
                ),
            ),
        }
    }
}

/// V014: a series opens with a `.0` release or a pre-release
pub fn check_series_first(deliv: &Deliverable, _config: &ToolConfig, ctx: &mut ValidationContext) {
    if deliv.is_independent() {
        return;
    }
    let [first] = deliv.releases() else {
        return;
    };
    let version = &first.version;
    if version.is_prerelease() {
        return;
    }
    let patch = version.as_str().rsplit('.').next().unwrap_or_default();
    if patch != "0" {
        ctx.error(
            "V014",
            format!(
                "First release {version} in {} must be a .0 release or a pre-release",
                deliv.series()
            ),
        );
    }
}

/// Series released just before `series`.
///
/// Uses the configured series order when it names `series`, otherwise the
/// sorted directories next to `series_dir`.
fn previous_series(series: &str, series_dir: &Path, config: &ToolConfig) -> Option<String> {
    let known = &config.series.known;
    if let Some(index) = known.iter().position(|s| s == series) {
        return index.checked_sub(1).map(|i| known[i].clone());
    }

    let root = series_dir.parent()?;
    let mut names: Vec<String> = std::fs::read_dir(root)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name != INDEPENDENT)
        .collect();
    names.sort();
    let index = names.iter().position(|n| n == series)?;
    index.checked_sub(1).map(|i| names[i].clone())
}

/// Branches declared by a deliverable file that may hold nothing else.
fn declared_branches(content: &str) -> anyhow::Result<Vec<BranchEntry>> {
    if content.lines().all(|line| matches!(line.trim(), "" | "---")) {
        return Ok(Vec::new());
    }
    Ok(DeliverableFile::parse(content)?.branches)
}

/// V015: releases in a new series wait for the previous series' stable branch
pub fn check_series_open(deliv: &Deliverable, config: &ToolConfig, ctx: &mut ValidationContext) {
    if deliv.is_independent() || deliv.releases().is_empty() {
        return;
    }
    if config
        .series
        .current
        .as_deref()
        .is_some_and(|current| current != deliv.series())
    {
        return;
    }
    let Some(path) = deliv.path() else {
        return;
    };
    let (Some(series_dir), Some(file_name)) = (path.parent(), path.file_name()) else {
        return;
    };
    let Some(root) = series_dir.parent() else {
        return;
    };
    let Some(previous) = previous_series(deliv.series(), series_dir, config) else {
        return;
    };

    let previous_file = root.join(&previous).join(file_name);
    if !previous_file.is_file() {
        return;
    }
    let branches = match std::fs::read_to_string(&previous_file)
        .map_err(anyhow::Error::from)
        .and_then(|content| declared_branches(&content))
    {
        Ok(branches) => branches,
        Err(error) => {
            tracing::warn!(
                file = %previous_file.display(),
                error = %error,
                "cannot read previous series deliverable"
            );
            return;
        }
    };

    let expected = format!("stable/{previous}");
    if !branches.iter().any(|b| b.name == expected) {
        ctx.warning(
            "V015",
            format!(
                "{} has no {expected} branch yet, so {} is not open for releases",
                previous_file.display(),
                deliv.series()
            ),
        );
    }
}
