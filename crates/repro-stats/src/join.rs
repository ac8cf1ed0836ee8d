//! Cross-condition joins.
//!
//! Records are matched by exact identifier equality. A left join keeps
//! every control record with an optional treatment side; the matched
//! subset is the paired ("complete") view. Identifiers present on one
//! side only are excluded from paired analysis but keep contributing
//! to per-condition totals.

use std::collections::BTreeMap;

use repro_model::{DatasetRecord, Doi, ScriptId, ScriptRecord};

/// One script under both conditions (treatment side optional).
#[derive(Debug, Clone)]
pub struct ScriptPair {
    pub script_id: ScriptId,
    pub control: ScriptRecord,
    pub treatment: Option<ScriptRecord>,
}

impl ScriptPair {
    pub fn matched(&self) -> Option<(&ScriptRecord, &ScriptRecord)> {
        self.treatment
            .as_ref()
            .map(|treatment| (&self.control, treatment))
    }
}

/// Left-join the conditions' script tables on script identifier.
/// A duplicated treatment identifier keeps its first record.
pub fn pair_scripts(control: &[ScriptRecord], treatment: &[ScriptRecord]) -> Vec<ScriptPair> {
    let mut by_id: BTreeMap<&ScriptId, &ScriptRecord> = BTreeMap::new();
    for record in treatment {
        by_id.entry(&record.script_id).or_insert(record);
    }
    control
        .iter()
        .map(|record| ScriptPair {
            script_id: record.script_id.clone(),
            control: record.clone(),
            treatment: by_id.get(&record.script_id).map(|r| (*r).clone()),
        })
        .collect()
}

/// One dataset under both conditions (treatment side optional).
#[derive(Debug, Clone)]
pub struct DatasetPair {
    pub doi: Doi,
    pub control: DatasetRecord,
    pub treatment: Option<DatasetRecord>,
}

impl DatasetPair {
    pub fn matched(&self) -> Option<(&DatasetRecord, &DatasetRecord)> {
        self.treatment
            .as_ref()
            .map(|treatment| (&self.control, treatment))
    }
}

/// Left-join the conditions' dataset tables on identifier.
pub fn pair_datasets(control: &[DatasetRecord], treatment: &[DatasetRecord]) -> Vec<DatasetPair> {
    let mut by_doi: BTreeMap<&Doi, &DatasetRecord> = BTreeMap::new();
    for record in treatment {
        by_doi.entry(&record.doi).or_insert(record);
    }
    control
        .iter()
        .map(|record| DatasetPair {
            doi: record.doi.clone(),
            control: record.clone(),
            treatment: by_doi.get(&record.doi).map(|r| (*r).clone()),
        })
        .collect()
}
