//! Scalar prose inserts.
//!
//! One small markdown file per value referenced in the paper's prose,
//! so the text can transclude computed numbers instead of hard-coding
//! them.

use repro_model::ErrorCategory;
use repro_stats::{InventoryCounts, StudyMetrics, percent};

use crate::template::{format_percent, format_sig};

fn percent_file(value: f64) -> String {
    format!("{}%", format_percent(value))
}

fn ratio_file(value: f64) -> String {
    format!("{}x", format_sig(value, 3))
}

/// Build every `(filename, contents)` insert pair.
pub fn scalar_inserts(
    metrics: &StudyMetrics,
    inventory: &InventoryCounts,
) -> Vec<(String, String)> {
    let control = &metrics.control;
    let crosstab = &metrics.crosstab;
    let moved = |from: ErrorCategory, to: ErrorCategory| {
        percent_file(crosstab.moved_percent(from, to).unwrap_or(0.0))
    };
    let not_repeated =
        |from: ErrorCategory| percent_file(crosstab.not_repeated_percent(from).unwrap_or(0.0));

    let subject_percents: Vec<f64> = metrics
        .subject_rates
        .iter()
        .map(repro_stats::SubjectStats::error_percent)
        .collect();
    let min_subject = subject_percents
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max_subject = subject_percents.iter().copied().fold(0.0, f64::max);
    let physics_scripts = metrics
        .subject_rates
        .iter()
        .find(|stats| stats.subject == "Physics")
        .map(|stats| stats.total)
        .unwrap_or(0);

    let example_other_errors = metrics
        .scans
        .example_other_errors
        .iter()
        .map(|message| format!("- {message}\n"))
        .collect::<String>();

    let inserts: Vec<(&str, String)> = vec![
        ("lockfiles.md", inventory.lockfiles.to_string()),
        ("num_of_datasets.md", inventory.datasets.to_string()),
        (
            "num_successful_scripts_noraas.md",
            percent_file(percent(control.successes, control.total_excl_timeouts)),
        ),
        (
            "num_successful_datasets_noraas.md",
            metrics.control_datasets.clean.to_string(),
        ),
        (
            "perc_successful_datasets_noraas.md",
            percent_file(percent(
                metrics.control_datasets.clean,
                metrics.control_datasets.total,
            )),
        ),
        (
            "perc_library_errors_noraas.md",
            percent_file(control.category_percent_of_errors(ErrorCategory::Library)),
        ),
        ("number_of_physics_scripts.md", physics_scripts.to_string()),
        (
            "num_of_success_source_scripts.md",
            metrics.sourced.success_sourced.to_string(),
        ),
        (
            "perc_success_sourced_in_raas.md",
            percent_file(metrics.sourced.percent_of_paired_success),
        ),
        (
            "success_increase.md",
            ratio_file(metrics.paired.success_increase()),
        ),
        (
            "nr_raas_clean_dataset_increase.md",
            ratio_file(metrics.clean_datasets.clean_increase()),
        ),
        (
            "clean_raas_datasets.md",
            metrics.clean_datasets.treatment_clean.to_string(),
        ),
        (
            "perc_clean_raas_datasets.md",
            percent_file(metrics.clean_datasets.treatment_clean_percent()),
        ),
        (
            "library_to_success.md",
            crosstab
                .count(ErrorCategory::Library, ErrorCategory::Success)
                .to_string(),
        ),
        (
            "perc_library_fixed.md",
            moved(ErrorCategory::Library, ErrorCategory::Success),
        ),
        (
            "perc_wd_fixed.md",
            moved(ErrorCategory::WorkingDirectory, ErrorCategory::Success),
        ),
        (
            "perc_mf_fixed.md",
            moved(ErrorCategory::MissingFile, ErrorCategory::Success),
        ),
        (
            "mf_no_change.md",
            moved(ErrorCategory::MissingFile, ErrorCategory::MissingFile),
        ),
        (
            "perc_other_fixed.md",
            moved(ErrorCategory::Other, ErrorCategory::Success),
        ),
        (
            "perc_library_not_repeated.md",
            not_repeated(ErrorCategory::Library),
        ),
        (
            "perc_wd_not_repeated.md",
            not_repeated(ErrorCategory::WorkingDirectory),
        ),
        (
            "perc_errors_not_repeated.md",
            percent_file(crosstab.errors_not_repeated_percent().unwrap_or(0.0)),
        ),
        (
            "min_subject_perc.md",
            percent_file(if min_subject.is_finite() {
                min_subject
            } else {
                0.0
            }),
        ),
        ("max_subject_perc.md", percent_file(max_subject)),
        (
            "len_set_not_loaded_packages.md",
            metrics.scans.distinct_missing_packages.to_string(),
        ),
        (
            "missing_file_perc_control.md",
            percent_file(control.category_percent_of_errors(ErrorCategory::MissingFile)),
        ),
        (
            "missing_file_perc_treat.md",
            percent_file(
                metrics
                    .treatment_failures
                    .category_percent(ErrorCategory::MissingFile),
            ),
        ),
        (
            "miss_obj_to_success.md",
            metrics.scans.missing_object_to_success.to_string(),
        ),
        (
            "num_success_to_error.md",
            metrics.success_to_error.total.to_string(),
        ),
        (
            "success_to_error_rdtLite_errors.md",
            metrics.success_to_error.tool_artifacts.to_string(),
        ),
        (
            "success_to_error_mf_errors.md",
            metrics.success_to_error.missing_file.to_string(),
        ),
        (
            "success_to_error_func_errors.md",
            metrics.success_to_error.function.to_string(),
        ),
        (
            "success_to_error_other_errors.md",
            metrics.success_to_error.other.to_string(),
        ),
        (
            "perc_successful_scripts_raas.md",
            percent_file(metrics.success_rates.scripts_treatment.percent_good()),
        ),
        (
            "perc_successful_scripts_noraas.md",
            percent_file(metrics.success_rates.scripts_control.percent_good()),
        ),
        (
            "perc_error_scripts_raas.md",
            percent_file(percent(
                metrics.success_rates.scripts_treatment.bad(),
                metrics.success_rates.scripts_treatment.total,
            )),
        ),
        (
            "perc_easily_fixed.md",
            percent_file(metrics.paired.easily_fixed_percent(crosstab)),
        ),
        ("list_of_example_other_errors.md", example_other_errors),
        (
            "faster_with_raas_datasets.md",
            metrics.clean_datasets.faster_with_treatment.to_string(),
        ),
        (
            "library_version_loaded.md",
            metrics
                .scans
                .first_library_error
                .clone()
                .unwrap_or_default(),
        ),
        (
            "runnable_datasets.md",
            metrics.dataset_level.runnable.to_string(),
        ),
        (
            "runnable_scripts.md",
            metrics.script_level.runnable.to_string(),
        ),
    ];

    inserts
        .into_iter()
        .map(|(name, contents)| (name.to_string(), contents))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metrics_produce_defined_values() {
        let inserts = scalar_inserts(&StudyMetrics::default(), &InventoryCounts::default());
        let lookup = |name: &str| {
            inserts
                .iter()
                .find(|(file, _)| file == name)
                .map(|(_, contents)| contents.clone())
                .unwrap()
        };
        // Undefined movement percentages render as zero.
        assert_eq!(lookup("perc_library_not_repeated.md"), "0.0%");
        assert_eq!(lookup("success_increase.md"), "0x");
        assert_eq!(lookup("num_of_datasets.md"), "0");
        assert_eq!(lookup("min_subject_perc.md"), "0.0%");
    }

    #[test]
    fn every_insert_has_a_unique_filename() {
        let inserts = scalar_inserts(&StudyMetrics::default(), &InventoryCounts::default());
        let mut names: Vec<&str> = inserts.iter().map(|(name, _)| name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(total >= 40);
    }
}
