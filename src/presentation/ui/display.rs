use colored::{Color, ColoredString, Colorize};
use console::{measure_text_width, pad_str, Alignment};

use crate::application::use_cases::status_check::StatusReport;
use crate::application::use_cases::sync_repositories::{PassResult, SyncResult};
use crate::common::result::ManageResult;
use crate::domain::entities::managed_repo_registry::ManagedRepoRegistry;
use crate::domain::entities::report_row::{ReportRow, ReportValue, RowState};
use crate::domain::value_objects::summary_code::{ERROR_MARKER, PLACEHOLDER, SUMMARY_HEADER, SUMMARY_LEGEND};

const HEADERS: [&str; 6] = [SUMMARY_HEADER, "Local Directory", "Unt", "Mod", "Stg", "Heads"];
const COLUMN_GAP: &str = "  ";

/// Render a count cell: blank for zero, `.` for not applicable, `?` for unknown
fn count_cell(value: ReportValue<usize>) -> String {
    match value {
        ReportValue::Value(0) => String::new(),
        ReportValue::Value(n) => n.to_string(),
        ReportValue::NotApplicable => PLACEHOLDER.to_string(),
        ReportValue::Unknown => ERROR_MARKER.to_string(),
    }
}

fn heads_cell(row: &ReportRow) -> String {
    match &row.state {
        RowState::Inspected { status, .. } => status
            .branch_names
            .iter()
            .map(|name| {
                if status.is_active_branch(name) {
                    name.green().bold().to_string()
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        RowState::NotARepository => PLACEHOLDER.to_string(),
        RowState::Failed { .. } => ERROR_MARKER.to_string(),
    }
}

/// Name colour by validity, managed state and local changes (dirty or untracked)
fn name_color(row: &ReportRow) -> Option<Color> {
    match &row.state {
        RowState::Failed { .. } => Some(Color::Magenta),
        RowState::NotARepository => Some(Color::Red),
        RowState::Inspected { managed, status } => {
            let changed = status.is_dirty || status.has_untracked();
            match (*managed, changed) {
                (true, false) => Some(Color::Green),
                (true, true) => Some(Color::Yellow),
                (false, true) => Some(Color::Blue),
                (false, false) => None,
            }
        }
    }
}

fn name_cell(row: &ReportRow) -> ColoredString {
    let name = row.dir_name.as_str();
    match name_color(row) {
        Some(color) => name.color(color),
        None => name.normal(),
    }
}

fn row_cells(row: &ReportRow) -> [String; 6] {
    [
        row.summary.to_string(),
        name_cell(row).to_string(),
        count_cell(row.untracked()),
        count_cell(row.modified()),
        count_cell(row.staged()),
        heads_cell(row),
    ]
}

/// Render the status table, one line per row, widths measured without ANSI codes
pub fn render_table(report: &StatusReport) -> String {
    let header: [String; 6] = HEADERS.map(|h| h.bold().to_string());
    let body: Vec<[String; 6]> = report.rows.iter().map(row_cells).collect();

    let mut widths = [0usize; 6];
    for cells in std::iter::once(&header).chain(body.iter()) {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let mut output = String::new();
    for cells in std::iter::once(&header).chain(body.iter()) {
        let line = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                // Numeric columns are right aligned, the last column is not padded
                match column {
                    2..=4 => pad_str(cell, widths[column], Alignment::Right, None).into_owned(),
                    5 => cell.clone(),
                    _ => pad_str(cell, widths[column], Alignment::Left, None).into_owned(),
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Render the summary code legend
pub fn render_legend() -> String {
    let mut output = format!("{}:\n", SUMMARY_HEADER.bold());
    for (code, meaning) in SUMMARY_LEGEND {
        output.push_str(&format!("  {}  {}\n", code, meaning));
    }
    output
}

/// Render one-line counts under the table
pub fn render_counts(report: &StatusReport) -> String {
    let counts = &report.counts;
    let mut parts = vec![
        format!("{} directories", counts.total),
        format!("{} repositories", counts.repositories),
        format!("{} managed", counts.managed),
        format!("{} dirty", counts.dirty),
    ];
    if counts.failed > 0 {
        parts.push(format!("{} failed", counts.failed).magenta().to_string());
    }
    parts.join(", ")
}

/// Serialise the report as pretty JSON
pub fn render_json(report: &StatusReport) -> ManageResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Serialise the report as YAML
pub fn render_yaml(report: &StatusReport) -> ManageResult<String> {
    Ok(serde_yaml::to_string(report)?)
}

/// Render managed entries in entry order, names padded to the longest one
pub fn render_entries(registry: &ManagedRepoRegistry) -> String {
    let width = registry.max_name_len();
    registry
        .sorted()
        .iter()
        .map(|entry| {
            format!(
                "{}{}{}\n",
                pad_str(entry.local_dir(), width, Alignment::Left, None),
                COLUMN_GAP,
                entry.remote_url()
            )
        })
        .collect()
}

fn pass_line(label: &str, pass: &PassResult) -> String {
    match pass {
        PassResult::Skipped => format!("{}: {}", label, "skipped".dimmed()),
        PassResult::Completed(summary) => {
            let failures = summary.failures.len();
            if failures == 0 {
                format!("{}: {}", label, "ok".green())
            } else {
                format!("{}: {}", label, format!("{} failure(s) ignored", failures).yellow())
            }
        }
        PassResult::Aborted(e) => format!("{}: {} ({})", label, "aborted".red().bold(), e),
    }
}

/// Render the outcome of the clone and fetch passes
pub fn render_sync_summary(result: &SyncResult) -> String {
    let mut output = format!(
        "{} cloned, {} present, {} fetched, {} failure(s)\n",
        result.cloned_count(),
        result.present_count(),
        result.fetched_count(),
        result.failure_count()
    );
    output.push_str(&format!("  {}\n", pass_line("Clone", &result.clone_pass)));
    output.push_str(&format!("  {}\n", pass_line("Fetch", &result.fetch_pass)));

    for pass in [&result.clone_pass, &result.fetch_pass] {
        if let Some(summary) = pass.summary() {
            for failure in &summary.failures {
                output.push_str(&format!("  {} {}\n", "!".yellow().bold(), failure));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::repository_status::WorkingCopyStatus;
    use crate::domain::value_objects::remote_comparison::RemoteComparison;
    use pretty_assertions::assert_eq;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn report() -> StatusReport {
        let status = WorkingCopyStatus {
            is_dirty: true,
            untracked_count: 3,
            modified_count: 0,
            staged_count: 12,
            remote_comparison: RemoteComparison::Behind,
            ..Default::default()
        }
        .with_branches(
            vec!["main".to_string(), "dev".to_string()],
            Some("main".to_string()),
        );
        StatusReport::new(vec![
            ReportRow::inspected("notes", true, status),
            ReportRow::not_a_repository("downloads"),
            ReportRow::failed("broken", "corrupt index"),
        ])
    }

    #[test]
    fn test_count_cells() {
        assert_eq!(count_cell(ReportValue::Value(0)), "");
        assert_eq!(count_cell(ReportValue::Value(7)), "7");
        assert_eq!(count_cell(ReportValue::NotApplicable), ".");
        assert_eq!(count_cell(ReportValue::Unknown), "?");
    }

    #[test]
    fn test_render_table() {
        no_color();
        let table = render_table(&report());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "MRUDC  Local Directory  Unt  Mod  Stg  Heads");
        assert_eq!(lines[1], "M.UD<  notes              3        12  dev main");
        assert_eq!(lines[2], ".N...  downloads          .    .    .  .");
        assert_eq!(lines[3], "?????  broken             ?    ?    ?  ?");
    }

    #[test]
    fn test_render_entries_sorted_and_padded() {
        let registry = ManagedRepoRegistry::from_lines([
            "notes,https://example.com/notes",
            "B,https://example.com/b",
            "a,https://example.com/a",
        ])
        .unwrap();
        assert_eq!(
            render_entries(&registry),
            "a      https://example.com/a\nB      https://example.com/b\nnotes  https://example.com/notes\n"
        );
    }

    #[test]
    fn test_render_json_rows() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][0]["summary"], "M.UD<");
        assert_eq!(value["rows"][1]["state"], "not_a_repository");
        assert_eq!(value["counts"]["failed"], 1);
    }

    #[test]
    fn test_render_yaml_rows() {
        let yaml = render_yaml(&report()).unwrap();
        assert!(yaml.contains("dir_name: notes"));
        assert!(yaml.contains("?????"));
        assert!(yaml.contains("state: failed"));
    }

    #[test]
    fn test_render_legend_lists_every_code() {
        no_color();
        let legend = render_legend();
        assert!(legend.starts_with("MRUDC:"));
        assert_eq!(legend.lines().count(), SUMMARY_LEGEND.len() + 1);
    }

    #[test]
    fn test_untracked_only_counts_as_changed_for_name_colour() {
        let untracked = WorkingCopyStatus {
            untracked_count: 2,
            ..Default::default()
        };
        let clean = WorkingCopyStatus::default();

        assert_eq!(
            name_color(&ReportRow::inspected("notes", true, untracked.clone())),
            Some(Color::Yellow)
        );
        assert_eq!(
            name_color(&ReportRow::inspected("scratch", false, untracked)),
            Some(Color::Blue)
        );
        assert_eq!(
            name_color(&ReportRow::inspected("notes", true, clean.clone())),
            Some(Color::Green)
        );
        assert_eq!(name_color(&ReportRow::inspected("scratch", false, clean)), None);
        assert_eq!(name_color(&ReportRow::not_a_repository("downloads")), Some(Color::Red));
        assert_eq!(name_color(&ReportRow::failed("broken", "corrupt")), Some(Color::Magenta));
    }
}
