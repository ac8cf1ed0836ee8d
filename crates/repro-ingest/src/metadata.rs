//! Archive metadata for each dataset.
//!
//! The metadata file maps each identifier to a two-element array of
//! subject tags and publication year. Entries written after a failed
//! fetch carry `null` or `false` in either slot; decoding is lenient
//! because downstream aggregation must tolerate absent metadata.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use repro_model::Doi;

use crate::error::{IngestError, Result};

/// Subjects and publication year for one dataset, either of which may
/// be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub subjects: Option<Vec<String>>,
    pub year: Option<String>,
}

/// Load the metadata map, keyed by canonical identifier.
pub fn read_doi_metadata(path: &Path) -> Result<BTreeMap<Doi, DatasetMetadata>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let Value::Object(entries) = value else {
        return Err(IngestError::malformed(path, "expected a top-level object"));
    };

    let mut metadata = BTreeMap::new();
    for (key, entry) in entries {
        let Ok(doi) = Doi::parse(&key) else {
            continue;
        };
        metadata.insert(doi, decode_entry(&entry));
    }
    debug!(path = %path.display(), count = metadata.len(), "loaded dataset metadata");
    Ok(metadata)
}

fn decode_entry(entry: &Value) -> DatasetMetadata {
    let Value::Array(parts) = entry else {
        return DatasetMetadata::default();
    };
    let subjects = match parts.first() {
        Some(Value::Array(values)) => Some(
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    };
    let year = match parts.get(1) {
        Some(Value::String(year)) => Some(year.clone()),
        _ => None,
    };
    DatasetMetadata { subjects, year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn metadata_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn decodes_subjects_and_year() {
        let file = metadata_file(
            r#"{"doi:10.7910/DVN/AAA111": [["Social Sciences", "Law"], "2019-04-01"]}"#,
        );
        let metadata = read_doi_metadata(file.path()).unwrap();
        let entry = metadata
            .get(&Doi::parse("doi:10.7910/DVN/AAA111").unwrap())
            .unwrap();
        assert_eq!(
            entry.subjects.as_deref(),
            Some(&["Social Sciences".to_string(), "Law".to_string()][..])
        );
        assert_eq!(entry.year.as_deref(), Some("2019-04-01"));
    }

    #[test]
    fn keys_with_trailing_newlines_are_normalized() {
        let file = metadata_file(r#"{"doi:10.7910/DVN/AAA111\n": [null, "2018"]}"#);
        let metadata = read_doi_metadata(file.path()).unwrap();
        assert!(
            metadata
                .contains_key(&Doi::parse("doi:10.7910/DVN/AAA111").unwrap())
        );
    }

    #[test]
    fn failed_fetch_entries_decode_as_absent() {
        let file = metadata_file(r#"{"doi:10.7910/DVN/BBB222": [false, false]}"#);
        let metadata = read_doi_metadata(file.path()).unwrap();
        let entry = metadata
            .get(&Doi::parse("doi:10.7910/DVN/BBB222").unwrap())
            .unwrap();
        assert_eq!(entry.subjects, None);
        assert_eq!(entry.year, None);
    }

    #[test]
    fn null_subjects_decode_as_absent() {
        let file = metadata_file(r#"{"doi:10.7910/DVN/CCC333": [null, "2020-01-01"]}"#);
        let metadata = read_doi_metadata(file.path()).unwrap();
        let entry = metadata
            .get(&Doi::parse("doi:10.7910/DVN/CCC333").unwrap())
            .unwrap();
        assert_eq!(entry.subjects, None);
        assert_eq!(entry.year.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn non_object_document_is_an_error() {
        let file = metadata_file("[1, 2, 3]");
        assert!(read_doi_metadata(file.path()).is_err());
    }
}
