//! Per-condition dataset assembly.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use repro_ingest::{DatasetMetadata, RunReport};
use repro_model::{DatasetRecord, Doi, ScriptRecord};

use crate::cleanliness::{clean_by_doi, is_clean};

/// Per-dataset wall-clock budget; a run past this is a timeout.
pub const TIMEOUT_LIMIT_SECS: f64 = 18_000.0;

/// Assemble the control-condition dataset table.
///
/// Only datasets with archive subject metadata and a recorded elapsed
/// time enter the analysis. The timed-out flag is the union of the
/// recorded timeout list and the elapsed-time budget.
pub fn build_control_datasets(
    metadata: &BTreeMap<Doi, DatasetMetadata>,
    times: &BTreeMap<Doi, f64>,
    timeouts: &BTreeSet<Doi>,
    scripts: &[ScriptRecord],
) -> Vec<DatasetRecord> {
    let clean = clean_by_doi(scripts);
    let records: Vec<DatasetRecord> = metadata
        .iter()
        .filter_map(|(doi, meta)| {
            let subjects = meta.subjects.as_ref()?;
            let elapsed = *times.get(doi)?;
            let timed_out = elapsed > TIMEOUT_LIMIT_SECS || timeouts.contains(doi);
            Some(DatasetRecord {
                doi: doi.clone(),
                year: meta.year.clone(),
                subjects: subjects.iter().cloned().collect(),
                elapsed_secs: Some(elapsed),
                timed_out,
                clean: Some(clean.get(doi).copied().unwrap_or(false)),
            })
        })
        .collect();
    debug!(count = records.len(), "assembled control datasets");
    records
}

/// Assemble the treatment-condition dataset table from the run
/// reports. Cleanliness is unknown for reports with no script
/// breakdown; the timed-out rule mirrors the control one.
pub fn build_treatment_datasets(
    reports: &[RunReport],
    timeouts: &BTreeSet<Doi>,
) -> Vec<DatasetRecord> {
    let records: Vec<DatasetRecord> = reports
        .iter()
        .map(|report| {
            let clean = if report.scripts.is_empty() {
                None
            } else {
                Some(is_clean(
                    report.scripts.iter().map(|script| script.error.as_str()),
                ))
            };
            let over_budget = report
                .build_secs
                .map(|secs| secs > TIMEOUT_LIMIT_SECS)
                .unwrap_or(false);
            DatasetRecord {
                doi: report.doi.clone(),
                year: None,
                subjects: BTreeSet::new(),
                elapsed_secs: report.build_secs,
                timed_out: timeouts.contains(&report.doi) || over_budget,
                clean,
            }
        })
        .collect();
    debug!(count = records.len(), "assembled treatment datasets");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_ingest::ReportScript;

    fn doi(tail: &str) -> Doi {
        Doi::parse(format!("doi:10.7910/DVN/{tail}")).unwrap()
    }

    fn meta(subjects: Option<&[&str]>, year: Option<&str>) -> DatasetMetadata {
        DatasetMetadata {
            subjects: subjects.map(|s| s.iter().map(|v| (*v).to_string()).collect()),
            year: year.map(str::to_string),
        }
    }

    #[test]
    fn control_requires_metadata_and_timing() {
        let mut metadata = BTreeMap::new();
        metadata.insert(doi("AAA111"), meta(Some(&["Law"]), Some("2019")));
        metadata.insert(doi("BBB222"), meta(None, Some("2018")));
        metadata.insert(doi("CCC333"), meta(Some(&["Physics"]), Some("2020")));
        let mut times = BTreeMap::new();
        times.insert(doi("AAA111"), 100.0);
        times.insert(doi("BBB222"), 100.0);

        let records =
            build_control_datasets(&metadata, &times, &BTreeSet::new(), &[]);
        // BBB222 lacks subjects, CCC333 lacks timing.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].doi, doi("AAA111"));
        assert_eq!(records[0].clean, Some(false));
    }

    #[test]
    fn control_timeout_is_union_of_list_and_budget() {
        let mut metadata = BTreeMap::new();
        metadata.insert(doi("AAA111"), meta(Some(&["Law"]), None));
        metadata.insert(doi("BBB222"), meta(Some(&["Law"]), None));
        metadata.insert(doi("CCC333"), meta(Some(&["Law"]), None));
        let mut times = BTreeMap::new();
        times.insert(doi("AAA111"), 20_000.0);
        times.insert(doi("BBB222"), TIMEOUT_LIMIT_SECS);
        times.insert(doi("CCC333"), 50.0);
        let mut listed = BTreeSet::new();
        listed.insert(doi("CCC333"));

        let records = build_control_datasets(&metadata, &times, &listed, &[]);
        let by_doi: BTreeMap<&Doi, bool> =
            records.iter().map(|r| (&r.doi, r.timed_out)).collect();
        assert_eq!(by_doi[&doi("AAA111")], true);
        // Exactly at the budget is not a timeout.
        assert_eq!(by_doi[&doi("BBB222")], false);
        assert_eq!(by_doi[&doi("CCC333")], true);
    }

    #[test]
    fn treatment_cleanliness_unknown_without_scripts() {
        let reports = vec![
            RunReport {
                doi: doi("AAA111"),
                build_secs: Some(10.0),
                scripts: vec![],
            },
            RunReport {
                doi: doi("BBB222"),
                build_secs: Some(10.0),
                scripts: vec![ReportScript {
                    filename: "a.R".to_string(),
                    error: "success".to_string(),
                    timed_out: false,
                }],
            },
        ];
        let records = build_treatment_datasets(&reports, &BTreeSet::new());
        assert_eq!(records[0].clean, None);
        assert_eq!(records[1].clean, Some(true));
    }
}
