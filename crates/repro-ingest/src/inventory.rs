//! Small inventory inputs used for prose counts.

use std::path::Path;

use serde_json::Value;

use repro_model::Doi;

use crate::error::{IngestError, Result};

/// Read the study's dataset inventory (newline-delimited identifiers).
pub fn read_doi_inventory(path: &Path) -> Result<Vec<Doi>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let mut dois = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let doi = Doi::parse(line).map_err(|e| IngestError::malformed(path, e.to_string()))?;
        dois.push(doi);
    }
    Ok(dois)
}

/// Read the total hit count from a saved archive search result
/// (`data.total_count`).
pub fn read_search_total_count(path: &Path) -> Result<u64> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| IngestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    value
        .get("data")
        .and_then(|data| data.get("total_count"))
        .and_then(Value::as_u64)
        .ok_or_else(|| IngestError::malformed(path, "missing data.total_count"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_inventory_lines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "doi:10.7910/DVN/AAA111\ndoi:10.7910/DVN/BBB222\n").unwrap();
        let dois = read_doi_inventory(file.path()).unwrap();
        assert_eq!(dois.len(), 2);
    }

    #[test]
    fn reads_search_total_count() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"status": "OK", "data": {{"total_count": 45}}}}"#).unwrap();
        assert_eq!(read_search_total_count(file.path()).unwrap(), 45);
    }

    #[test]
    fn missing_count_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"data": {{}}}}"#).unwrap();
        assert!(read_search_total_count(file.path()).is_err());
    }
}
