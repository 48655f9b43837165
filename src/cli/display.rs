//! Terminal display for validation results and deliverable summaries
//!
//! Diagnostics go to stderr so stdout stays clean for rendered output.

use std::fmt::Write as _;

use colored::Colorize;

use crate::deliverable::{BranchLocation, Deliverable};
use crate::log::ValidationOutcome;
use crate::validate::{Severity, ValidationContext};

/// Print the header shown before checking a file
pub fn print_file_header(file: &str) {
    eprintln!("\n{} {}", "Checking".bold().cyan(), file.bold());
}

/// Print each finding for one deliverable
pub fn print_findings(ctx: &ValidationContext) {
    for finding in ctx.findings() {
        let label = match finding.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARN ".yellow().bold(),
        };
        eprintln!("  {label} {} {}", finding.code.dimmed(), finding.message);
    }
    if ctx.is_clean() {
        eprintln!("  {}", "ok".green());
    }
}

/// Print a load failure for a file that could not be parsed
pub fn print_load_failure(error: &anyhow::Error) {
    eprintln!("  {} {error:#}", "ERROR".red().bold());
}

/// Print totals across all checked files
pub fn print_summary(outcomes: &[ValidationOutcome]) {
    let errors: usize = outcomes.iter().map(|o| o.errors.len()).sum();
    let warnings: usize = outcomes.iter().map(|o| o.warnings.len()).sum();

    eprintln!("{}", "─".repeat(50).dimmed());
    let status = if errors == 0 {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    eprintln!(
        "  {status} {} file(s), {errors} error(s), {warnings} warning(s)",
        outcomes.len()
    );

    for outcome in outcomes.iter().filter(|o| !o.passed()) {
        eprintln!("\n  {}", outcome.file.bold());
        for error in &outcome.errors {
            eprintln!("    {error}");
        }
    }
}

/// Plain-text summary of a deliverable for `relcycle show`
#[must_use]
pub fn format_deliverable(deliv: &Deliverable) -> String {
    let file = deliv.file();
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", deliv.name(), deliv.series());
    if let Some(team) = deliv.team() {
        let _ = writeln!(out, "  team: {team}");
    }
    if let Some(model) = deliv.release_model() {
        let _ = writeln!(out, "  release-model: {}", model.as_str());
    }
    if let Some(kind) = deliv.kind() {
        let _ = writeln!(out, "  type: {kind}");
    }

    let repos: Vec<&str> = deliv.known_repos().into_iter().collect();
    let _ = writeln!(out, "  repositories: {}", repos.join(", "));

    if !file.cycle_highlights.is_empty() {
        let _ = writeln!(out, "  highlights:");
        for highlight in &file.cycle_highlights {
            let _ = writeln!(out, "    - {highlight}");
        }
    }

    let _ = writeln!(out, "  releases:");
    for release in deliv.releases() {
        for project in &release.projects {
            let _ = writeln!(
                out,
                "    {} {} {}",
                release.version,
                project.repo,
                short_hash(&project.hash)
            );
        }
    }

    if !deliv.branches().is_empty() {
        let _ = writeln!(out, "  branches:");
        for branch in deliv.branches() {
            match &branch.location {
                BranchLocation::Version(version) => {
                    let _ = writeln!(out, "    {} at {version}", branch.name);
                }
                BranchLocation::Commits(commits) => {
                    let points: Vec<String> = commits
                        .iter()
                        .map(|(repo, hash)| format!("{repo}@{}", short_hash(hash)))
                        .collect();
                    let _ = writeln!(out, "    {} at {}", branch.name, points.join(", "));
                }
            }
        }
    }

    out
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
