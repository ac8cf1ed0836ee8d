//! Derived study metrics.
//!
//! Everything the report templates consume is computed here in one
//! pass over the normalized record tables. All functions are pure;
//! percentages over an empty denominator are zero.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use repro_model::{DatasetRecord, Doi, ErrorCategory, SUCCESS, ScriptRecord};

use crate::crosstab::CrossTab;
use crate::join::{DatasetPair, ScriptPair, pair_datasets, pair_scripts};

/// Number of example messages quoted in the prose for the `other`
/// category.
const EXAMPLE_OTHER_ERRORS: usize = 3;

/// The normalized record tables for both conditions.
#[derive(Debug, Clone, Default)]
pub struct StudyData {
    pub control_scripts: Vec<ScriptRecord>,
    pub control_datasets: Vec<DatasetRecord>,
    pub treatment_scripts: Vec<ScriptRecord>,
    pub treatment_datasets: Vec<DatasetRecord>,
    /// Datasets the treatment condition gave up on, including ones
    /// that never produced a run report.
    pub treatment_timeouts: BTreeSet<Doi>,
}

/// Counts from the study's small side inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryCounts {
    /// Datasets in the study inventory list.
    pub datasets: usize,
    /// Dependency lockfiles found on the archive.
    pub lockfiles: u64,
}

pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// A total and the subset that succeeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    pub total: usize,
    pub good: usize,
}

impl Tally {
    pub fn bad(&self) -> usize {
        self.total - self.good
    }

    pub fn percent_good(&self) -> f64 {
        percent(self.good, self.total)
    }
}

/// Per-condition script totals and category counts.
#[derive(Debug, Clone, Default)]
pub struct ConditionScripts {
    /// Scripts that ran to a verdict (timeouts excluded).
    pub total_excl_timeouts: usize,
    pub successes: usize,
    /// Scripts whose category is neither success nor timeout.
    pub errors: usize,
    pub categories: BTreeMap<ErrorCategory, usize>,
}

impl ConditionScripts {
    pub fn from_records(records: &[ScriptRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            *stats.categories.entry(record.category).or_insert(0) += 1;
            if record.category != ErrorCategory::TimedOut {
                stats.total_excl_timeouts += 1;
            }
            match record.category {
                ErrorCategory::Success => stats.successes += 1,
                category if category.is_error() => stats.errors += 1,
                _ => {}
            }
        }
        stats
    }

    pub fn category(&self, category: ErrorCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn category_percent_of_errors(&self, category: ErrorCategory) -> f64 {
        percent(self.category(category), self.errors)
    }
}

/// Treatment-side failure tallies (every script whose raw outcome is
/// not the success sentinel, timeouts included).
#[derive(Debug, Clone, Default)]
pub struct FailureTally {
    pub total: usize,
    pub categories: BTreeMap<ErrorCategory, usize>,
}

impl FailureTally {
    pub fn from_records(records: &[ScriptRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            if record.error == SUCCESS {
                continue;
            }
            tally.total += 1;
            *tally.categories.entry(record.category).or_insert(0) += 1;
        }
        tally
    }

    pub fn category(&self, category: ErrorCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn category_percent(&self, category: ErrorCategory) -> f64 {
        percent(self.category(category), self.total)
    }
}

/// Control-side dataset tallies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlDatasets {
    pub total: usize,
    pub clean: usize,
    pub timed_out: usize,
}

impl ControlDatasets {
    fn from_records(records: &[DatasetRecord]) -> Self {
        Self {
            total: records.len(),
            clean: records
                .iter()
                .filter(|record| record.clean == Some(true))
                .count(),
            timed_out: records.iter().filter(|record| record.timed_out).count(),
        }
    }
}

/// Script counts for one subject tag.
#[derive(Debug, Clone)]
pub struct SubjectStats {
    pub subject: String,
    pub total: usize,
    pub errors: usize,
}

impl SubjectStats {
    /// Errors here count every non-success outcome, timeouts included.
    pub fn error_percent(&self) -> f64 {
        percent(self.errors, self.total)
    }
}

/// Script counts per subject over the given dataset slice. Subjects
/// with no scripts are omitted.
pub fn subject_breakdown(
    datasets: &[DatasetRecord],
    scripts: &[ScriptRecord],
) -> Vec<SubjectStats> {
    let mut subjects: BTreeSet<&str> = BTreeSet::new();
    for dataset in datasets {
        subjects.extend(dataset.subjects.iter().map(String::as_str));
    }

    let mut breakdown = Vec::new();
    for subject in subjects {
        let dois: BTreeSet<&Doi> = datasets
            .iter()
            .filter(|dataset| dataset.has_subject(subject))
            .map(|dataset| &dataset.doi)
            .collect();
        let in_subject: Vec<&ScriptRecord> = scripts
            .iter()
            .filter(|record| dois.contains(&record.doi))
            .collect();
        if in_subject.is_empty() {
            continue;
        }
        let errors = in_subject
            .iter()
            .filter(|record| record.category != ErrorCategory::Success)
            .count();
        breakdown.push(SubjectStats {
            subject: subject.to_string(),
            total: in_subject.len(),
            errors,
        });
    }
    breakdown
}

/// Script counts per publication year.
#[derive(Debug, Clone)]
pub struct YearStats {
    pub year: String,
    pub total: usize,
    pub errors: usize,
}

impl YearStats {
    pub fn error_percent(&self) -> f64 {
        percent(self.errors, self.total)
    }
}

/// Script counts per year, joining scripts to their dataset's year.
/// Scripts whose dataset has no year are excluded; years with no
/// scripts are omitted. Sorted by year.
pub fn year_breakdown(datasets: &[DatasetRecord], scripts: &[ScriptRecord]) -> Vec<YearStats> {
    let year_by_doi: BTreeMap<&Doi, &str> = datasets
        .iter()
        .filter_map(|dataset| {
            dataset
                .year
                .as_deref()
                .map(|year| (&dataset.doi, &year[..year.len().min(4)]))
        })
        .collect();

    let mut by_year: BTreeMap<&str, YearStats> = BTreeMap::new();
    for record in scripts {
        let Some(year) = year_by_doi.get(&record.doi) else {
            continue;
        };
        let entry = by_year.entry(year).or_insert_with(|| YearStats {
            year: (*year).to_string(),
            total: 0,
            errors: 0,
        });
        entry.total += 1;
        if record.category != ErrorCategory::Success {
            entry.errors += 1;
        }
    }
    by_year.into_values().collect()
}

/// Dataset completion accounting across the conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutOverview {
    pub total_datasets: usize,
    /// Control runs that did not complete (timed out).
    pub control_incomplete: usize,
    /// Treatment runs that did not complete (no report, no recorded
    /// time, or timed out).
    pub treatment_incomplete: usize,
    pub both_completed_datasets: usize,
    /// Scripts executed under both conditions.
    pub paired_scripts: usize,
    pub total_scripts: usize,
}

/// Success tallies over the datasets present under both conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessRates {
    pub scripts_control: Tally,
    pub scripts_treatment: Tally,
    pub datasets_control: Tally,
    pub datasets_treatment: Tally,
}

/// Paired-script category movement summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairedStats {
    pub pairs: usize,
    pub control_success: usize,
    pub treatment_success: usize,
    /// Paired scripts whose control category is not success.
    pub control_errored: usize,
}

impl PairedStats {
    /// Library and working-directory errors resolved by the tool,
    /// over all paired scripts that errored in the control run.
    pub fn easily_fixed_percent(&self, crosstab: &CrossTab) -> f64 {
        let fixed = crosstab.count(ErrorCategory::Library, ErrorCategory::Success)
            + crosstab.count(ErrorCategory::WorkingDirectory, ErrorCategory::Success);
        percent(fixed, self.control_errored)
    }

    pub fn success_increase(&self) -> f64 {
        ratio(self.treatment_success, self.control_success)
    }
}

/// Dataset-granularity fractions for the paper's summary table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetLevel {
    pub runnable: usize,
    pub control_clean: usize,
    pub treatment_clean: usize,
    pub control_timed_out: usize,
    pub treatment_timed_out: usize,
}

/// Script-granularity fractions for the paper's summary table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLevel {
    pub runnable: usize,
    pub control_success: usize,
    pub treatment_success: usize,
    pub control_timed_out: usize,
    pub treatment_timed_out: usize,
}

/// Cleanliness and runtime facts over the datasets with reports under
/// both conditions.
#[derive(Debug, Clone, Default)]
pub struct CleanDatasets {
    pub control_clean: usize,
    pub treatment_clean: usize,
    /// Paired datasets with a recorded treatment time.
    pub treatment_with_time: usize,
    /// (control, treatment) runtimes for datasets clean under both
    /// conditions; drives the runtime scatter.
    pub both_clean_runtimes: Vec<(f64, f64)>,
    /// Both-clean datasets that ran faster under the treatment.
    pub faster_with_treatment: usize,
}

impl CleanDatasets {
    pub fn clean_increase(&self) -> f64 {
        ratio(self.treatment_clean, self.control_clean)
    }

    pub fn treatment_clean_percent(&self) -> f64 {
        percent(self.treatment_clean, self.treatment_with_time)
    }
}

/// Scripts executed only through the tool's whole-dataset pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcedStats {
    /// Control successes among datasets completed under both
    /// conditions that have no individual treatment record.
    pub success_sourced: usize,
    /// The above, relative to paired control successes.
    pub percent_of_paired_success: f64,
}

/// Paired scripts that regressed from success to an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessToError {
    pub total: usize,
    /// Regressions attributable to the tool's provenance tracer
    /// (device teardown or tracer failures).
    pub tool_artifacts: usize,
    pub missing_file: usize,
    pub function: usize,
    pub other: usize,
}

/// Counts and examples scraped from raw error messages.
#[derive(Debug, Clone, Default)]
pub struct MessageScans {
    /// Distinct package names in paired treatment library errors.
    pub distinct_missing_packages: usize,
    /// First paired treatment library error, for quoting.
    pub first_library_error: Option<String>,
    /// Distinct missing-object control messages among other->success
    /// pairs.
    pub missing_object_to_success: usize,
    /// Example treatment `other` failure messages.
    pub example_other_errors: Vec<String>,
}

/// Every derived figure the report layer consumes.
#[derive(Debug, Clone, Default)]
pub struct StudyMetrics {
    pub control: ConditionScripts,
    pub control_datasets: ControlDatasets,
    pub treatment_failures: FailureTally,
    /// Subject table over datasets that completed in the control run.
    pub subject_table: Vec<SubjectStats>,
    /// Subject rates over every control dataset (figure and prose).
    pub subject_rates: Vec<SubjectStats>,
    pub year_table: Vec<YearStats>,
    pub timeouts: TimeoutOverview,
    pub success_rates: SuccessRates,
    pub crosstab: CrossTab,
    pub paired: PairedStats,
    pub dataset_level: DatasetLevel,
    pub script_level: ScriptLevel,
    pub clean_datasets: CleanDatasets,
    pub sourced: SourcedStats,
    pub success_to_error: SuccessToError,
    pub scans: MessageScans,
}

impl StudyMetrics {
    pub fn compute(data: &StudyData) -> Self {
        let script_pairs = pair_scripts(&data.control_scripts, &data.treatment_scripts);
        let dataset_pairs = pair_datasets(&data.control_datasets, &data.treatment_datasets);

        let control = ConditionScripts::from_records(&data.control_scripts);
        let control_datasets = ControlDatasets::from_records(&data.control_datasets);
        let treatment_failures = FailureTally::from_records(&data.treatment_scripts);

        let valid_datasets: Vec<DatasetRecord> = data
            .control_datasets
            .iter()
            .filter(|dataset| !dataset.timed_out)
            .cloned()
            .collect();
        let subject_table = subject_breakdown(&valid_datasets, &data.control_scripts);
        let subject_rates = subject_breakdown(&data.control_datasets, &data.control_scripts);
        let year_table = year_breakdown(&data.control_datasets, &data.control_scripts);

        let timeouts = timeout_overview(&dataset_pairs, &script_pairs, &data.treatment_timeouts);
        let success_rates = success_rates(&script_pairs, &dataset_pairs);

        let crosstab = CrossTab::from_pairs(
            script_pairs
                .iter()
                .filter_map(ScriptPair::matched)
                .map(|(control, treatment)| (control.category, treatment.category)),
        );
        let paired = paired_stats(&script_pairs);
        let dataset_level = dataset_level(&dataset_pairs, &data.treatment_timeouts);
        let script_level = script_level(&script_pairs);
        let clean_datasets = clean_datasets(&dataset_pairs);
        let sourced = sourced_stats(&script_pairs, &dataset_pairs, &data.treatment_timeouts, &paired);
        let success_to_error = success_to_error(&script_pairs);
        let scans = message_scans(&script_pairs, &data.treatment_scripts);

        debug!(
            control_scripts = data.control_scripts.len(),
            treatment_scripts = data.treatment_scripts.len(),
            paired_scripts = timeouts.paired_scripts,
            "computed study metrics"
        );

        Self {
            control,
            control_datasets,
            treatment_failures,
            subject_table,
            subject_rates,
            year_table,
            timeouts,
            success_rates,
            crosstab,
            paired,
            dataset_level,
            script_level,
            clean_datasets,
            sourced,
            success_to_error,
            scans,
        }
    }
}

fn treatment_completed(pair: &DatasetPair, timeouts: &BTreeSet<Doi>) -> bool {
    match &pair.treatment {
        Some(treatment) => {
            treatment.elapsed_secs.is_some() && !treatment.timed_out && !timeouts.contains(&pair.doi)
        }
        None => false,
    }
}

fn timeout_overview(
    dataset_pairs: &[DatasetPair],
    script_pairs: &[ScriptPair],
    treatment_timeouts: &BTreeSet<Doi>,
) -> TimeoutOverview {
    let control_incomplete = dataset_pairs
        .iter()
        .filter(|pair| pair.control.timed_out)
        .count();
    let treatment_incomplete = dataset_pairs
        .iter()
        .filter(|pair| !treatment_completed(pair, treatment_timeouts))
        .count();
    let both_completed_datasets = dataset_pairs
        .iter()
        .filter(|pair| !pair.control.timed_out && treatment_completed(pair, treatment_timeouts))
        .count();
    TimeoutOverview {
        total_datasets: dataset_pairs.len(),
        control_incomplete,
        treatment_incomplete,
        both_completed_datasets,
        paired_scripts: script_pairs
            .iter()
            .filter(|pair| pair.treatment.is_some())
            .count(),
        total_scripts: script_pairs.len(),
    }
}

fn success_rates(script_pairs: &[ScriptPair], dataset_pairs: &[DatasetPair]) -> SuccessRates {
    let paired_dois: BTreeSet<&Doi> = dataset_pairs
        .iter()
        .filter(|pair| pair.treatment.is_some())
        .map(|pair| &pair.doi)
        .collect();

    let mut scripts_control = Tally::default();
    let mut scripts_treatment = Tally::default();
    for pair in script_pairs {
        if !paired_dois.contains(&pair.control.doi) {
            continue;
        }
        scripts_control.total += 1;
        if pair.control.error == SUCCESS {
            scripts_control.good += 1;
        }
        if let Some(treatment) = &pair.treatment {
            scripts_treatment.total += 1;
            if treatment.error == SUCCESS {
                scripts_treatment.good += 1;
            }
        }
    }

    let mut datasets_control = Tally::default();
    let mut datasets_treatment = Tally::default();
    for pair in dataset_pairs {
        let Some(treatment) = &pair.treatment else {
            continue;
        };
        datasets_control.total += 1;
        datasets_treatment.total += 1;
        if pair.control.clean == Some(true) {
            datasets_control.good += 1;
        }
        if treatment.clean == Some(true) {
            datasets_treatment.good += 1;
        }
    }

    SuccessRates {
        scripts_control,
        scripts_treatment,
        datasets_control,
        datasets_treatment,
    }
}

fn paired_stats(script_pairs: &[ScriptPair]) -> PairedStats {
    let mut stats = PairedStats::default();
    for (control, treatment) in script_pairs.iter().filter_map(ScriptPair::matched) {
        stats.pairs += 1;
        if control.category == ErrorCategory::Success {
            stats.control_success += 1;
        } else {
            stats.control_errored += 1;
        }
        if treatment.category == ErrorCategory::Success {
            stats.treatment_success += 1;
        }
    }
    stats
}

fn dataset_level(dataset_pairs: &[DatasetPair], treatment_timeouts: &BTreeSet<Doi>) -> DatasetLevel {
    let mut level = DatasetLevel {
        runnable: dataset_pairs.len(),
        ..DatasetLevel::default()
    };
    for pair in dataset_pairs {
        if pair.control.clean == Some(true) {
            level.control_clean += 1;
        }
        if pair.control.timed_out {
            level.control_timed_out += 1;
        }
        let treatment_timed_out = match &pair.treatment {
            Some(treatment) => treatment.timed_out,
            None => treatment_timeouts.contains(&pair.doi),
        };
        if treatment_timed_out {
            level.treatment_timed_out += 1;
        }
        if pair
            .treatment
            .as_ref()
            .is_some_and(|treatment| treatment.clean == Some(true))
        {
            level.treatment_clean += 1;
        }
    }
    level
}

fn script_level(script_pairs: &[ScriptPair]) -> ScriptLevel {
    let mut level = ScriptLevel {
        runnable: script_pairs.len(),
        ..ScriptLevel::default()
    };
    for pair in script_pairs {
        if pair.control.error == SUCCESS {
            level.control_success += 1;
        }
        if pair.control.category == ErrorCategory::TimedOut {
            level.control_timed_out += 1;
        }
        if let Some(treatment) = &pair.treatment {
            if treatment.error == SUCCESS {
                level.treatment_success += 1;
            }
            if treatment.category == ErrorCategory::TimedOut {
                level.treatment_timed_out += 1;
            }
        }
    }
    level
}

fn clean_datasets(dataset_pairs: &[DatasetPair]) -> CleanDatasets {
    let mut stats = CleanDatasets::default();
    for pair in dataset_pairs {
        let Some(treatment) = &pair.treatment else {
            continue;
        };
        if treatment.elapsed_secs.is_some() {
            stats.treatment_with_time += 1;
        }
        if pair.control.clean == Some(true) {
            stats.control_clean += 1;
        }
        if treatment.clean == Some(true) {
            stats.treatment_clean += 1;
        }
        if pair.control.clean == Some(true) && treatment.clean == Some(true) {
            if let (Some(control_secs), Some(treatment_secs)) =
                (pair.control.elapsed_secs, treatment.elapsed_secs)
            {
                stats.both_clean_runtimes.push((control_secs, treatment_secs));
                if treatment_secs < control_secs {
                    stats.faster_with_treatment += 1;
                }
            }
        }
    }
    stats
}

fn sourced_stats(
    script_pairs: &[ScriptPair],
    dataset_pairs: &[DatasetPair],
    treatment_timeouts: &BTreeSet<Doi>,
    paired: &PairedStats,
) -> SourcedStats {
    let completed_dois: BTreeSet<&Doi> = dataset_pairs
        .iter()
        .filter(|pair| !pair.control.timed_out && treatment_completed(pair, treatment_timeouts))
        .map(|pair| &pair.doi)
        .collect();
    let success_sourced = script_pairs
        .iter()
        .filter(|pair| {
            pair.treatment.is_none()
                && completed_dois.contains(&pair.control.doi)
                && pair.control.category == ErrorCategory::Success
        })
        .count();
    SourcedStats {
        success_sourced,
        percent_of_paired_success: percent(success_sourced, paired.control_success),
    }
}

/// True for treatment errors produced by the provenance tracer rather
/// than the script itself.
fn is_tool_artifact(message: &str) -> bool {
    message.contains("dev.off") || message == "rdtLite Error"
}

fn success_to_error(script_pairs: &[ScriptPair]) -> SuccessToError {
    let mut stats = SuccessToError::default();
    for (control, treatment) in script_pairs.iter().filter_map(ScriptPair::matched) {
        if control.category != ErrorCategory::Success
            || treatment.category == ErrorCategory::Success
        {
            continue;
        }
        stats.total += 1;
        if is_tool_artifact(&treatment.error) {
            stats.tool_artifacts += 1;
            continue;
        }
        match treatment.category {
            ErrorCategory::MissingFile => stats.missing_file += 1,
            ErrorCategory::Function => stats.function += 1,
            ErrorCategory::Other => stats.other += 1,
            _ => {}
        }
    }
    stats
}

/// Extract the package name quoted between typographic quotes in an R
/// library error.
pub fn extract_package_name(message: &str) -> Option<&str> {
    let open = '\u{2018}';
    let close = '\u{2019}';
    let start = message.find(open)? + open.len_utf8();
    let end = message.rfind(close)?;
    (end > start).then(|| &message[start..end])
}

/// Matches R's `object ... not found` messages (at least one
/// character between the two phrases).
pub fn is_missing_object_message(message: &str) -> bool {
    let Some(idx) = message.find("object") else {
        return false;
    };
    let rest = &message[idx + "object".len()..];
    let mut chars = rest.char_indices();
    chars.next();
    match chars.next() {
        Some((offset, _)) => rest[offset..].contains("not found"),
        None => false,
    }
}

fn message_scans(script_pairs: &[ScriptPair], treatment_scripts: &[ScriptRecord]) -> MessageScans {
    let mut packages: BTreeSet<&str> = BTreeSet::new();
    let mut first_library_error = None;
    for (_, treatment) in script_pairs.iter().filter_map(ScriptPair::matched) {
        if treatment.category != ErrorCategory::Library {
            continue;
        }
        if first_library_error.is_none() {
            first_library_error = Some(treatment.error.trim().to_string());
        }
        if let Some(package) = extract_package_name(&treatment.error) {
            packages.insert(package);
        }
    }

    let mut missing_object_messages: BTreeSet<&str> = BTreeSet::new();
    for (control, treatment) in script_pairs.iter().filter_map(ScriptPair::matched) {
        if control.category == ErrorCategory::Other
            && treatment.category == ErrorCategory::Success
            && is_missing_object_message(&control.error)
        {
            missing_object_messages.insert(control.error.as_str());
        }
    }

    let mut example_other_errors = Vec::new();
    for record in treatment_scripts {
        if record.error != SUCCESS
            && record.category == ErrorCategory::Other
            && !example_other_errors.contains(&record.error)
        {
            example_other_errors.push(record.error.clone());
            if example_other_errors.len() == EXAMPLE_OTHER_ERRORS {
                break;
            }
        }
    }

    MessageScans {
        distinct_missing_packages: packages.len(),
        first_library_error,
        missing_object_to_success: missing_object_messages.len(),
        example_other_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doi(tail: &str) -> Doi {
        Doi::parse(format!("doi:10.7910/DVN/{tail}")).unwrap()
    }

    #[test]
    fn condition_scripts_counts() {
        let scripts = vec![
            ScriptRecord::new(doi("AAA111"), "a.R", "success"),
            ScriptRecord::new(doi("AAA111"), "b.R", "timed out"),
            ScriptRecord::new(doi("AAA111"), "c.R", "Error in library(x)"),
            ScriptRecord::new(doi("AAA111"), "d.R", "mystery failure"),
        ];
        let stats = ConditionScripts::from_records(&scripts);
        assert_eq!(stats.total_excl_timeouts, 3);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.category(ErrorCategory::Library), 1);
        assert_eq!(stats.category(ErrorCategory::TimedOut), 1);
    }

    #[test]
    fn subject_breakdown_counts_non_success() {
        let mut subjects = BTreeSet::new();
        subjects.insert("Law".to_string());
        let datasets = vec![DatasetRecord {
            doi: doi("AAA111"),
            year: Some("2019".to_string()),
            subjects,
            elapsed_secs: Some(5.0),
            timed_out: false,
            clean: Some(false),
        }];
        let scripts = vec![
            ScriptRecord::new(doi("AAA111"), "a.R", "success"),
            ScriptRecord::new(doi("AAA111"), "b.R", "timed out"),
            ScriptRecord::new(doi("BBB222"), "c.R", "success"),
        ];
        let breakdown = subject_breakdown(&datasets, &scripts);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].subject, "Law");
        assert_eq!(breakdown[0].total, 2);
        assert_eq!(breakdown[0].errors, 1);
    }

    #[test]
    fn year_breakdown_truncates_publication_dates() {
        let datasets = vec![DatasetRecord {
            doi: doi("AAA111"),
            year: Some("2019-04-01".to_string()),
            subjects: BTreeSet::new(),
            elapsed_secs: Some(5.0),
            timed_out: false,
            clean: Some(true),
        }];
        let scripts = vec![ScriptRecord::new(doi("AAA111"), "a.R", "success")];
        let years = year_breakdown(&datasets, &scripts);
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, "2019");
        assert_eq!(years[0].total, 1);
    }

    #[test]
    fn package_name_extraction() {
        assert_eq!(
            extract_package_name("there is no package called \u{2018}rstan\u{2019}"),
            Some("rstan")
        );
        assert_eq!(extract_package_name("no quotes here"), None);
        assert_eq!(extract_package_name("empty \u{2018}\u{2019}"), None);
    }

    #[test]
    fn missing_object_message_requires_gap() {
        assert!(is_missing_object_message("object 'x' not found"));
        assert!(!is_missing_object_message("objectnot found"));
        assert!(!is_missing_object_message("nothing to see"));
    }

    #[test]
    fn percent_of_zero_is_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(ratio(3, 0), 0.0);
    }
}
