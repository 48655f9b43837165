//! Schedule rendering to a reStructuredText `list-table`.
//!
//! Each week becomes one table row with four cells: date range, name,
//! cross-project events and project-specific events. Event lists are
//! rendered as bullets of `:ref:` links. The first bullet shares the cell
//! marker line, the rest are indented onto their own lines.

use std::fmt::Write as _;

use chrono::NaiveDate;

use super::model::{Cycle, Week};

const HEADER: &str = "\
.. list-table::
   :header-rows: 1
   :class: schedule

   * - Week
     - Name
     - Cross-project events
     - Project-specific events
";

const ROW_MARKER: &str = "   * - ";
const CELL_MARKER: &str = "     - ";
const CONTINUATION: &str = "       ";

/// Format a date as `YYYY-MM-DD`
#[must_use]
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render the full table: directive, header row and one row per week.
#[must_use]
pub fn render_schedule<F>(cycle: &Cycle, format_date: F) -> String
where
    F: Fn(NaiveDate) -> String,
{
    let mut out = String::from(HEADER);
    out.push_str(&render_table(cycle, format_date));
    out
}

/// Render the full table with ISO dates.
#[must_use]
pub fn render_schedule_default(cycle: &Cycle) -> String {
    render_schedule(cycle, iso_date)
}

/// Render only the week rows, in input order.
#[must_use]
pub fn render_table<F>(cycle: &Cycle, format_date: F) -> String
where
    F: Fn(NaiveDate) -> String,
{
    let mut out = String::new();
    for week in cycle.weeks() {
        render_row(&mut out, week, &format_date);
    }
    out
}

fn render_row<F>(out: &mut String, week: &Week, format_date: &F)
where
    F: Fn(NaiveDate) -> String,
{
    let _ = writeln!(
        out,
        "{ROW_MARKER}{} - {}",
        format_date(week.start),
        format_date(week.end)
    );
    push_cell(out, &week.name);
    push_ref_list(out, &week.x_project);
    push_ref_list(out, &week.project);
}

fn push_cell(out: &mut String, text: &str) {
    if text.is_empty() {
        out.push_str(CELL_MARKER.trim_end());
    } else {
        out.push_str(CELL_MARKER);
        out.push_str(text);
    }
    out.push('\n');
}

fn push_ref_list(out: &mut String, refs: &[String]) {
    let Some((first, rest)) = refs.split_first() else {
        push_cell(out, "");
        return;
    };
    let _ = writeln!(out, "{CELL_MARKER}* :ref:`{first}`");
    for item in rest {
        let _ = writeln!(out, "{CONTINUATION}* :ref:`{item}`");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn example_week() -> Week {
        Week::new(date(2018, 8, 27), date(2018, 9, 2))
            .named("R-1")
            .with_x_project(["goal-1"])
    }

    /// Split rendered rows into per-week chunks, each starting at a row marker.
    fn rows(rendered: &str) -> Vec<Vec<&str>> {
        let mut rows: Vec<Vec<&str>> = Vec::new();
        for line in rendered.lines() {
            if line.starts_with(ROW_MARKER) {
                rows.push(vec![line]);
            } else if let Some(row) = rows.last_mut() {
                row.push(line);
            }
        }
        rows
    }

    #[test]
    fn test_example_week_row() {
        let cycle = Cycle::new(vec![example_week()]);
        let rendered = render_table(&cycle, iso_date);
        assert_eq!(
            rendered,
            "   * - 2018-08-27 - 2018-09-02\n     - R-1\n     - * :ref:`goal-1`\n     -\n"
        );
    }

    #[test]
    fn test_full_schedule_has_header() {
        let cycle = Cycle::new(vec![example_week()]);
        let rendered = render_schedule_default(&cycle);
        assert!(rendered.starts_with(".. list-table::\n"));
        assert!(rendered.contains("     - Cross-project events\n"));
        assert!(rendered.ends_with("     -\n"));
    }

    #[test]
    fn test_row_count_matches_weeks_in_order() {
        let cycle = Cycle::new(vec![
            Week::new(date(2018, 8, 27), date(2018, 9, 2)).named("R-2"),
            Week::new(date(2018, 9, 3), date(2018, 9, 9)).named("R-1"),
            Week::new(date(2018, 9, 10), date(2018, 9, 16)).named("R-0"),
        ]);
        let rendered = render_table(&cycle, iso_date);
        let rows = rows(&rendered);
        assert_eq!(rows.len(), 3);
        let names: Vec<&str> = rows.iter().map(|r| r[1]).collect();
        assert_eq!(names, vec!["     - R-2", "     - R-1", "     - R-0"]);
    }

    #[test]
    fn test_empty_cycle_renders_no_rows() {
        let rendered = render_table(&Cycle::default(), iso_date);
        assert!(rendered.is_empty());
    }

    #[test]
    fn test_week_without_events_has_two_empty_cells() {
        let cycle = Cycle::new(vec![
            Week::new(date(2018, 8, 27), date(2018, 9, 2)).named("R-1")
        ]);
        let rendered = render_table(&cycle, iso_date);
        let row = &rows(&rendered)[0];
        assert_eq!(row.len(), 4);
        assert_eq!(row[2], "     -");
        assert_eq!(row[3], "     -");
    }

    #[test]
    fn test_unnamed_week_renders_blank_name() {
        let cycle = Cycle::new(vec![Week::new(date(2018, 8, 20), date(2018, 8, 26))]);
        let rendered = render_table(&cycle, iso_date);
        assert_eq!(rows(&rendered)[0][1], "     -");
    }

    #[test]
    fn test_first_bullet_formatted_distinctly() {
        let cycle = Cycle::new(vec![Week::new(date(2018, 8, 27), date(2018, 9, 2))
            .with_x_project(["a", "b", "c"])]);
        let rendered = render_table(&cycle, iso_date);
        let row = &rows(&rendered)[0];
        let bullets: Vec<&str> = row[2..5].to_vec();
        assert_eq!(
            bullets,
            vec![
                "     - * :ref:`a`",
                "       * :ref:`b`",
                "       * :ref:`c`",
            ]
        );
        assert_eq!(row[5], "     -");
    }

    #[test]
    fn test_project_specific_list_rendered_like_cross_project() {
        let cycle = Cycle::new(vec![Week::new(date(2018, 8, 27), date(2018, 9, 2))
            .with_project(["p-1", "p-2"])]);
        let rendered = render_table(&cycle, iso_date);
        assert!(rendered.ends_with("     -\n     - * :ref:`p-1`\n       * :ref:`p-2`\n"));
    }

    #[test]
    fn test_references_not_sorted_or_deduplicated() {
        let cycle = Cycle::new(vec![Week::new(date(2018, 8, 27), date(2018, 9, 2))
            .with_x_project(["z", "a", "z"])]);
        let rendered = render_table(&cycle, iso_date);
        let refs: Vec<&str> = rendered
            .lines()
            .filter_map(|l| l.trim_start_matches(['-', ' ']).strip_prefix("* :ref:"))
            .collect();
        assert_eq!(refs, vec!["`z`", "`a`", "`z`"]);
    }

    #[test]
    fn test_custom_date_formatter() {
        let cycle = Cycle::new(vec![example_week()]);
        let rendered = render_table(&cycle, |d| d.format("%b %d").to_string());
        assert!(rendered.starts_with("   * - Aug 27 - Sep 02\n"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let cycle = Cycle::new(vec![
            example_week(),
            Week::new(date(2018, 9, 3), date(2018, 9, 9)).with_project(["x"]),
        ]);
        assert_eq!(
            render_schedule_default(&cycle),
            render_schedule_default(&cycle)
        );
    }
}
