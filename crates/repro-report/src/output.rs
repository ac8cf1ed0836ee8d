//! Output assembly: every markdown table and insert in one pass.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use repro_stats::{InventoryCounts, StudyMetrics};

use crate::change_table::change_table;
use crate::inserts::scalar_inserts;
use crate::sankey::sankey_input;
use crate::tables;
use crate::template::write_insert;

/// Write all markdown tables, scalar inserts, and the Sankey input
/// into `dir`. Returns the written paths.
pub fn write_markdown_outputs(
    dir: &Path,
    metrics: &StudyMetrics,
    inventory: &InventoryCounts,
) -> Result<Vec<PathBuf>> {
    let documents: Vec<(String, String)> = vec![
        (
            "chen_total_comparison.md".to_string(),
            tables::chen_total_comparison(&metrics.control),
        ),
        (
            "chen_category_comparison.md".to_string(),
            tables::chen_category_comparison(&metrics.control),
        ),
        (
            "subject_breakdown.md".to_string(),
            tables::subject_breakdown_table(&metrics.subject_table),
        ),
        (
            "timed_out_comparisons.md".to_string(),
            tables::timeout_comparison_table(&metrics.timeouts),
        ),
        (
            "success_rates_comparisons.md".to_string(),
            tables::success_rates_table(&metrics.success_rates),
        ),
        (
            "error_categories_comparisons.md".to_string(),
            tables::treatment_categories_table(&metrics.treatment_failures),
        ),
        (
            "error_change_table.md".to_string(),
            change_table(&metrics.crosstab),
        ),
        (
            "dataset_level_table.md".to_string(),
            tables::dataset_level_table(&metrics.dataset_level),
        ),
        (
            "script_level_table.md".to_string(),
            tables::script_level_table(&metrics.script_level),
        ),
        (
            "sankey_input.txt".to_string(),
            sankey_input(&metrics.crosstab),
        ),
    ];

    let mut written = Vec::new();
    for (name, contents) in documents {
        written.push(write_insert(dir, &name, &contents)?);
    }
    for (name, contents) in scalar_inserts(metrics, inventory) {
        written.push(write_insert(dir, &name, &contents)?);
    }
    info!(dir = %dir.display(), count = written.len(), "wrote markdown outputs");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_tables_and_inserts() {
        let dir = TempDir::new().unwrap();
        let written = write_markdown_outputs(
            dir.path(),
            &StudyMetrics::default(),
            &InventoryCounts::default(),
        )
        .unwrap();
        assert!(written.len() > 40);
        assert!(dir.path().join("chen_total_comparison.md").is_file());
        assert!(dir.path().join("sankey_input.txt").is_file());
        assert!(dir.path().join("runnable_scripts.md").is_file());
    }
}
