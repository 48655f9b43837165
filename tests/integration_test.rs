#![allow(missing_docs)]

use std::path::Path;

use tempfile::TempDir;

use relcycle::config::ToolConfig;
use relcycle::deliverable::Deliverable;
use relcycle::log::{ReportLogger, ValidationOutcome};
use relcycle::schedule::{render_schedule_default, Cycle, ScheduleFile};
use relcycle::validate::validate_deliverable;

const TEST_CONFIG: &str = r#"
[series]
current = "rocky"
known = ["queens", "rocky"]

[validation]
teams = ["oslo", "Release Management"]
"#;

const GOOD_DELIVERABLE: &str = r"---
launchpad: oslo.config
team: oslo
type: library
release-model: cycle-with-rc
repository-settings:
  openstack/oslo.config:
    tarball-base: oslo-config
cycle-highlights:
  - Drivers can be loaded from entry points.
releases:
  - version: 2.0.0.0rc1
    projects:
      - repo: openstack/oslo.config
        hash: a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5
  - version: 2.0.0
    projects:
      - repo: openstack/oslo.config
        hash: a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5
branches:
  - name: stable/rocky
    location: 2.0.0.0rc1
release-notes: https://docs.openstack.org/releasenotes/oslo.config/rocky.html
";

const BAD_DELIVERABLE: &str = r"---
launchpad: release-test
team: nonsense-name
release-model: cycle-with-intermediary
releases:
  - version: 0.0.3
    projects:
      - repo: openstack/release-test
        hash: not-a-hash
branches:
  - name: stable/queens
    location: 0.0.4
";

const SCHEDULE: &str = r"---
start-week: 2018-08-20
cycle:
  - {}
  - name: R-1
    x-project: [goal-1]
  - name: R-0
    x-project: [final-release, release-notes]
    project: [oslo-final]
";

fn write_tree(root: &Path) {
    let rocky = root.join("deliverables").join("rocky");
    std::fs::create_dir_all(&rocky).unwrap();
    std::fs::write(rocky.join("oslo.config.yaml"), GOOD_DELIVERABLE).unwrap();
    std::fs::write(rocky.join("release-test.yaml"), BAD_DELIVERABLE).unwrap();
}

/// Integration test: load deliverables from a series directory, check them
/// and record outcomes in the JSONL report.
#[test]
fn test_validate_series_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path());
    let config = ToolConfig::parse(TEST_CONFIG).unwrap();
    let logger = ReportLogger::new(temp_dir.path().join("reports")).unwrap();

    let series_dir = temp_dir.path().join("deliverables").join("rocky");
    for name in ["oslo.config.yaml", "release-test.yaml"] {
        let path = series_dir.join(name);
        let deliv = Deliverable::from_path(&path).unwrap();
        let ctx = validate_deliverable(&deliv, &config);
        logger
            .append(&ValidationOutcome::from_context(
                &path.display().to_string(),
                &deliv,
                &ctx,
            ))
            .unwrap();
    }

    let entries = logger.read_all().unwrap();
    assert_eq!(entries.len(), 2);

    let good = &entries[0];
    assert_eq!(good.name.as_deref(), Some("oslo.config"));
    assert_eq!(good.series.as_deref(), Some("rocky"));
    assert!(good.passed(), "unexpected errors: {:?}", good.errors);
    assert!(good.warnings.is_empty(), "unexpected warnings: {:?}", good.warnings);

    let bad = &entries[1];
    assert_eq!(bad.name.as_deref(), Some("release-test"));
    assert_eq!(bad.warnings.len(), 1, "{:?}", bad.warnings);
    assert!(bad.warnings[0].starts_with("V002"));
    let codes: Vec<&str> = bad.errors.iter().map(|e| &e[..4]).collect();
    assert_eq!(codes, vec!["V006", "V010", "V010", "V014"], "{:?}", bad.errors);
}

/// Structural problems stop loading with a descriptive error.
#[test]
fn test_structural_errors_fail_fast() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("rocky");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("orphan.yaml");
    std::fs::write(
        &path,
        "team: oslo\nreleases:\n  - version: 1.0.0\n    projects:\n      - repo: openstack/orphan\n        hash: a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5\n",
    )
    .unwrap();

    let err = Deliverable::from_path(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("orphan.yaml"), "{msg}");
    assert!(msg.contains("no project identity"), "{msg}");

    let outcome = ValidationOutcome::load_failure(&path.display().to_string(), &err);
    assert!(!outcome.passed());
}

/// A new series stays closed until the previous one has its stable branch.
#[test]
fn test_series_open_warning_across_series() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path());
    let queens = temp_dir.path().join("deliverables").join("queens");
    std::fs::create_dir_all(&queens).unwrap();
    std::fs::write(
        queens.join("oslo.config.yaml"),
        GOOD_DELIVERABLE.replace("name: stable/rocky", "name: feature/rocky"),
    )
    .unwrap();
    let config = ToolConfig::parse(TEST_CONFIG).unwrap();

    let path = temp_dir
        .path()
        .join("deliverables")
        .join("rocky")
        .join("oslo.config.yaml");
    let deliv = Deliverable::from_path(&path).unwrap();
    let ctx = validate_deliverable(&deliv, &config);

    assert_eq!(ctx.error_count(), 0, "{:?}", ctx.findings());
    let warnings: Vec<&str> = ctx.warnings().map(|f| f.code).collect();
    assert_eq!(warnings, vec!["V015"]);
}

/// Accessors expose the document shape.
#[test]
fn test_deliverable_shape() {
    let deliv = Deliverable::parse("rocky", "oslo.config", GOOD_DELIVERABLE).unwrap();
    assert_eq!(deliv.tarball_base("openstack/oslo.config"), "oslo-config");
    assert_eq!(deliv.file().cycle_highlights.len(), 1);
    assert_eq!(deliv.branches()[0].name, "stable/rocky");
    assert!(deliv.find_release("2.0.0.0rc1").is_some());
}

/// Integration test: schedule YAML to RST table.
#[test]
fn test_schedule_end_to_end() {
    let cycle: Cycle = ScheduleFile::parse(SCHEDULE)
        .unwrap()
        .into_cycle()
        .unwrap();
    assert_eq!(cycle.len(), 3);

    let rendered = render_schedule_default(&cycle);
    let expected_rows = "   * - 2018-08-20 - 2018-08-26
     -
     -
     -
   * - 2018-08-27 - 2018-09-02
     - R-1
     - * :ref:`goal-1`
     -
   * - 2018-09-03 - 2018-09-09
     - R-0
     - * :ref:`final-release`
       * :ref:`release-notes`
     - * :ref:`oslo-final`
";
    assert!(rendered.starts_with(".. list-table::\n"));
    assert!(
        rendered.ends_with(expected_rows),
        "rendered table:\n{rendered}"
    );

    let rows = rendered.lines().filter(|l| l.starts_with("   * - ")).count();
    // header row plus one row per week
    assert_eq!(rows, cycle.len() + 1);
}
