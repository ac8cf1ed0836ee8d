//! Dataset cleanliness.

use std::collections::{BTreeMap, BTreeSet};

use repro_model::{Doi, SUCCESS, ScriptRecord};

/// A dataset is clean iff at least one script ran and the set of
/// distinct raw outcomes is exactly the success sentinel.
pub fn is_clean<'a>(errors: impl IntoIterator<Item = &'a str>) -> bool {
    let distinct: BTreeSet<&str> = errors.into_iter().collect();
    distinct.len() == 1 && distinct.contains(SUCCESS)
}

/// Cleanliness per dataset over a script-record table. Datasets with
/// no recorded scripts are absent from the result.
pub fn clean_by_doi(scripts: &[ScriptRecord]) -> BTreeMap<Doi, bool> {
    let mut errors_by_doi: BTreeMap<&Doi, BTreeSet<&str>> = BTreeMap::new();
    for record in scripts {
        errors_by_doi
            .entry(&record.doi)
            .or_default()
            .insert(record.error.as_str());
    }
    errors_by_doi
        .into_iter()
        .map(|(doi, errors)| {
            let clean = errors.len() == 1 && errors.contains(SUCCESS);
            (doi.clone(), clean)
        })
        .collect()
}
