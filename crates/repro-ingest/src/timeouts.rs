//! Timed-out dataset lists.
//!
//! Each evaluation machine wrote a newline-delimited list of the
//! identifiers it gave up on. The control condition has a single list;
//! the treatment condition has one per machine under a directory tree.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use repro_model::Doi;

use crate::error::{IngestError, Result};

/// Read one newline-delimited identifier list. Blank lines are
/// skipped; entries are trimmed and deduplicated.
pub fn read_timeout_list(path: &Path) -> Result<BTreeSet<Doi>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let mut dois = BTreeSet::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let doi = Doi::parse(line).map_err(|e| IngestError::malformed(path, e.to_string()))?;
        dois.insert(doi);
    }
    Ok(dois)
}

/// Collect every `*<suffix>` list under `dir` (recursively) into one
/// deduplicated set.
pub fn collect_timeout_lists(dir: &Path, suffix: &str) -> Result<BTreeSet<Doi>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut dois = BTreeSet::new();
    let mut files = 0usize;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| IngestError::DirectoryScan {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(suffix))
            .unwrap_or(false);
        if !matches {
            continue;
        }
        dois.extend(read_timeout_list(entry.path())?);
        files += 1;
    }
    debug!(dir = %dir.display(), files, count = dois.len(), "collected timeout lists");
    Ok(dois)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_trimmed_deduplicated_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeouts.txt");
        std::fs::write(
            &path,
            "doi:10.7910/DVN/AAA111\ndoi:10.7910/DVN/BBB222\n\ndoi:10.7910/DVN/AAA111\n",
        )
        .unwrap();

        let dois = read_timeout_list(&path).unwrap();
        assert_eq!(dois.len(), 2);
        assert!(dois.contains(&Doi::parse("doi:10.7910/DVN/AAA111").unwrap()));
    }

    #[test]
    fn collects_lists_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("vm1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            nested.join("vm1-timeout-dois.txt"),
            "doi:10.7910/DVN/AAA111\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("vm2-timeout-dois.txt"),
            "doi:10.7910/DVN/BBB222\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a list\n").unwrap();

        let dois = collect_timeout_lists(dir.path(), "timeout-dois.txt").unwrap();
        assert_eq!(dois.len(), 2);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(collect_timeout_lists(&dir.path().join("absent"), "timeout-dois.txt").is_err());
    }
}
