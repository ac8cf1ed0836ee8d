//! Per-dataset execution times for the control condition.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use repro_model::Doi;

use crate::error::{IngestError, Result};

/// Read the timing CSV (columns `doi`, `time`; the `doi` column holds
/// dataset directory paths) into elapsed seconds per dataset. A
/// repeated identifier keeps the last recorded time.
pub fn read_dataset_times(path: &Path) -> Result<BTreeMap<Doi, f64>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();
    let doi_idx = headers
        .iter()
        .position(|h| h.trim() == "doi")
        .ok_or_else(|| IngestError::malformed(path, "missing doi column"))?;
    let time_idx = headers
        .iter()
        .position(|h| h.trim() == "time")
        .ok_or_else(|| IngestError::malformed(path, "missing time column"))?;

    let mut times = BTreeMap::new();
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let raw_path = row.get(doi_idx).unwrap_or("").trim();
        let raw_time = row.get(time_idx).unwrap_or("").trim();
        if raw_path.is_empty() {
            continue;
        }
        let doi = Doi::from_dataset_path(raw_path)
            .map_err(|e| IngestError::malformed(path, e.to_string()))?;
        let secs: f64 = raw_time
            .parse()
            .map_err(|_| IngestError::malformed(path, format!("bad time value {raw_time:?}")))?;
        times.insert(doi, secs);
    }
    debug!(path = %path.display(), count = times.len(), "loaded dataset times");
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_times_keyed_by_identifier() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "doi,time").unwrap();
        writeln!(file, "data/datasets/doi-10.7910-DVN-AAA111,123.5").unwrap();
        writeln!(file, "data/datasets/doi-10.7910-DVN-BBB222,42").unwrap();

        let times = read_dataset_times(file.path()).unwrap();
        assert_eq!(times.len(), 2);
        let key = Doi::parse("doi:10.7910/DVN/AAA111").unwrap();
        assert_eq!(times.get(&key), Some(&123.5));
    }

    #[test]
    fn repeated_identifier_keeps_last_time() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "doi,time").unwrap();
        writeln!(file, "data/datasets/doi-10.7910-DVN-AAA111,10").unwrap();
        writeln!(file, "data/datasets/doi-10.7910-DVN-AAA111,20").unwrap();

        let times = read_dataset_times(file.path()).unwrap();
        let key = Doi::parse("doi:10.7910/DVN/AAA111").unwrap();
        assert_eq!(times.get(&key), Some(&20.0));
    }

    #[test]
    fn bad_time_value_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "doi,time").unwrap();
        writeln!(file, "data/datasets/doi-10.7910-DVN-AAA111,soon").unwrap();
        assert!(read_dataset_times(file.path()).is_err());
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dataset,elapsed").unwrap();
        writeln!(file, "x,1").unwrap();
        assert!(read_dataset_times(file.path()).is_err());
    }
}
