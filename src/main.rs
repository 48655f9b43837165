//! relcycle - release cycle tooling
//!
//! CLI entry point: render schedules, show and validate deliverables.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use relcycle::cli::display;
use relcycle::config::ToolConfig;
use relcycle::deliverable::Deliverable;
use relcycle::log::{init_tracing, ReportLogger, ValidationOutcome};
use relcycle::schedule::{render_schedule, render_table, ScheduleFile};
use relcycle::validate::validate_deliverable;

/// Release cycle tooling
///
/// Renders release schedules and checks deliverable metadata files.
#[derive(Parser, Debug)]
#[command(name = "relcycle", version, about)]
struct Cli {
    /// Path to the relcycle.toml configuration file
    #[arg(long, global = true, default_value = "relcycle.toml")]
    config: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a schedule YAML file as an RST list-table
    Schedule {
        /// Schedule file to render
        file: PathBuf,

        /// strftime format for week dates
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,

        /// Emit only the week rows, without the table directive and header
        #[arg(long)]
        rows_only: bool,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Parse a deliverable file and print a summary
    Show {
        /// Deliverable file, laid out as deliverables/<series>/<name>.yaml
        file: PathBuf,
    },

    /// Check deliverable files for consistency problems
    Validate {
        /// Files to check; defaults to every file of the selected series
        files: Vec<PathBuf>,

        /// Root directory holding one sub-directory per series
        #[arg(long, default_value = "deliverables")]
        deliverables_dir: PathBuf,

        /// Series to check when no files are given (defaults to series.current)
        #[arg(long)]
        series: Option<String>,

        /// Directory for the JSONL report; no report is written when unset
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

/// Reject strftime strings that cannot format a plain date.
///
/// Covers both unparseable specifiers and ones that need a time or an
/// offset (`%H`, `%z`, ...), which chrono only reports while formatting.
fn check_date_format(date_format: &str) -> Result<()> {
    let sample = NaiveDate::from_ymd_opt(2018, 8, 27).context("Invalid sample date")?;
    let mut out = String::new();
    if write!(out, "{}", sample.format(date_format)).is_err() {
        bail!("Invalid date format '{date_format}'");
    }
    Ok(())
}

/// Render `file` with the given date format.
fn run_schedule(file: &Path, date_format: &str, rows_only: bool) -> Result<String> {
    check_date_format(date_format)?;
    let cycle = ScheduleFile::from_path(file)?.into_cycle()?;
    tracing::info!(weeks = cycle.len(), file = %file.display(), "rendering schedule");

    let format_date = |d: NaiveDate| d.format(date_format).to_string();
    Ok(if rows_only {
        render_table(&cycle, format_date)
    } else {
        render_schedule(&cycle, format_date)
    })
}

/// Pick the series to validate when no files are named.
fn resolve_series(explicit: Option<String>, config: &ToolConfig) -> Result<String> {
    explicit
        .or_else(|| config.series.current.clone())
        .context("No files given and no series selected: pass --series or set series.current")
}

/// List `<dir>/<series>/*.yaml`, sorted by path.
fn collect_series_files(dir: &Path, series: &str) -> Result<Vec<PathBuf>> {
    let series_dir = dir.join(series);
    let entries = std::fs::read_dir(&series_dir)
        .with_context(|| format!("Failed to list {}", series_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", series_dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "yaml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check each file, print findings and return one outcome per file.
fn run_validate(files: &[PathBuf], config: &ToolConfig) -> Vec<ValidationOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let label = path.display().to_string();
        display::print_file_header(&label);

        if !path.is_file() {
            tracing::warn!(file = %label, "file was deleted, skipping");
            continue;
        }

        let outcome = match Deliverable::from_path(path) {
            Ok(deliv) => {
                let ctx = validate_deliverable(&deliv, config);
                display::print_findings(&ctx);
                ValidationOutcome::from_context(&label, &deliv, &ctx)
            }
            Err(error) => {
                display::print_load_failure(&error);
                ValidationOutcome::load_failure(&label, &error)
            }
        };
        tracing::info!(
            file = %label,
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "checked deliverable"
        );
        outcomes.push(outcome);
    }

    outcomes
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Command::Schedule {
            file,
            date_format,
            rows_only,
            output,
        } => {
            let rendered = run_schedule(&file, &date_format, rows_only)
                .with_context(|| format!("Failed to render schedule '{}'", file.display()))?;
            write_output(&rendered, output.as_deref())?;
        }
        Command::Show { file } => {
            let deliv = Deliverable::from_path(&file)?;
            write_output(&display::format_deliverable(&deliv), None)?;
        }
        Command::Validate {
            files,
            deliverables_dir,
            series,
            report_dir,
        } => {
            let config = ToolConfig::load_or_default(&cli.config).with_context(|| {
                format!("Failed to load config from '{}'", cli.config.display())
            })?;

            let files = if files.is_empty() {
                let series = resolve_series(series, &config)?;
                eprintln!("no files given, validating all deliverables from {series}");
                collect_series_files(&deliverables_dir, &series)?
            } else {
                files
            };
            if files.is_empty() {
                bail!("No deliverable files to validate");
            }

            let outcomes = run_validate(&files, &config);

            if let Some(dir) = report_dir {
                let logger = ReportLogger::new(&dir).context("Failed to initialize JSONL report")?;
                for outcome in &outcomes {
                    logger
                        .append(outcome)
                        .context("Failed to write to JSONL report")?;
                }
            }

            display::print_summary(&outcomes);
            if outcomes.iter().any(|o| !o.passed()) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
