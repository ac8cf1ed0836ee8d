//! Category-change table.
//!
//! The reconciliation matrix rendered as a pandoc grid: one row per
//! control category with at least one paired script, one column per
//! published treatment category. Built from the cross-tab counts;
//! widths are computed from the content.

use repro_model::ErrorCategory;
use repro_stats::CrossTab;

/// Column order of the published table (success last; timeouts are
/// reported as rows only).
const COLUMNS: [ErrorCategory; 6] = [
    ErrorCategory::Library,
    ErrorCategory::WorkingDirectory,
    ErrorCategory::MissingFile,
    ErrorCategory::Function,
    ErrorCategory::Other,
    ErrorCategory::Success,
];

const LABEL_WIDTH: usize = 20;
const COLUMN_GAP: usize = 3;

/// Render the cross-tab as the paper's pre/post category grid.
pub fn change_table(crosstab: &CrossTab) -> String {
    let rows = crosstab.rows_present();

    let mut widths = Vec::with_capacity(COLUMNS.len());
    for column in COLUMNS {
        let mut width = column.as_str().len();
        for row in &rows {
            width = width.max(crosstab.count(*row, column).to_string().len());
        }
        widths.push(width);
    }

    let total_width = LABEL_WIDTH
        + widths
            .iter()
            .map(|width| width + COLUMN_GAP)
            .sum::<usize>();
    let rule = "-".repeat(total_width);

    let mut lines = Vec::new();
    lines.push(rule.clone());
    lines.push(format!("{:LABEL_WIDTH$}**Post-RaaS**", ""));
    lines.push(String::new());

    let mut header = format!("{:LABEL_WIDTH$}", "");
    for (column, width) in COLUMNS.iter().zip(widths.iter().copied()) {
        header.push_str(&format!("{:>width$}{:COLUMN_GAP$}", column.as_str(), ""));
    }
    lines.push(header.trim_end().to_string());
    lines.push(String::new());
    lines.push("  **Pre-RaaS**".to_string());
    lines.push(String::new());

    for row in &rows {
        let mut line = format!("  {:width$}", row.as_str(), width = LABEL_WIDTH - 2);
        for (column, width) in COLUMNS.iter().zip(widths.iter().copied()) {
            line.push_str(&format!(
                "{:>width$}{:COLUMN_GAP$}",
                crosstab.count(*row, *column),
                ""
            ));
        }
        lines.push(line.trim_end().to_string());
        lines.push(String::new());
    }

    lines.push(rule);
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_model::ErrorCategory as Cat;

    #[test]
    fn renders_rows_and_columns() {
        let tab = CrossTab::from_pairs([
            (Cat::WorkingDirectory, Cat::Success),
            (Cat::Success, Cat::Function),
        ]);
        let table = change_table(&tab);
        assert!(table.contains("**Post-RaaS**"));
        assert!(table.contains("**Pre-RaaS**"));
        assert!(table.contains("working directory"));
        // The working-directory row has a 1 in the success column.
        let row = table
            .lines()
            .find(|line| line.trim_start().starts_with("working directory"))
            .unwrap();
        assert!(row.ends_with('1'));
    }

    #[test]
    fn absent_timeout_rows_are_omitted() {
        let tab = CrossTab::from_pairs([(Cat::Library, Cat::Success)]);
        let table = change_table(&tab);
        assert!(!table.contains("timed out"));
    }

    #[test]
    fn empty_crosstab_still_renders_frame() {
        let table = change_table(&CrossTab::default());
        assert!(table.contains("**Post-RaaS**"));
        assert!(table.contains("success"));
    }
}
