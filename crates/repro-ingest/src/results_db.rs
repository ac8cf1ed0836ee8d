//! Control-condition results database.
//!
//! A single SQLite file records one row per executed script in a
//! `results` table: the script path under the dataset tree and the
//! error text (or a success/timeout sentinel).

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use repro_model::{Doi, ScriptRecord};

use crate::error::{IngestError, Result};

/// Read every script row and normalize it into a [`ScriptRecord`].
pub fn read_control_scripts(path: &Path) -> Result<Vec<ScriptRecord>> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| IngestError::database(path, e))?;
    let mut statement = conn
        .prepare("SELECT filename, error FROM results")
        .map_err(|e| IngestError::database(path, e))?;
    let rows = statement
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| IngestError::database(path, e))?;

    let mut records = Vec::new();
    for row in rows {
        let (filename, error) = row.map_err(|e| IngestError::database(path, e))?;
        let doi = Doi::from_dataset_path(&filename)
            .map_err(|e| IngestError::malformed(path, e.to_string()))?;
        records.push(ScriptRecord::new(doi, &filename, error));
    }
    debug!(path = %path.display(), count = records.len(), "loaded control script results");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_model::ErrorCategory;
    use tempfile::TempDir;

    fn write_results_db(dir: &TempDir, rows: &[(&str, &str)]) -> std::path::PathBuf {
        let path = dir.path().join("results.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE results (filename TEXT, error TEXT);")
            .unwrap();
        for (filename, error) in rows {
            conn.execute(
                "INSERT INTO results (filename, error) VALUES (?1, ?2)",
                rusqlite::params![filename, error],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn reads_and_normalizes_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_results_db(
            &dir,
            &[
                ("../data/datasets/doi-10.7910-DVN-AAA111/Run.R", "success"),
                (
                    "../data/datasets/doi-10.7910-DVN-AAA111/fig.R",
                    "Error in library(ggplot2)",
                ),
            ],
        );

        let records = read_control_scripts(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doi.as_str(), "doi:10.7910/DVN/AAA111");
        assert_eq!(
            records[0].script_id.as_str(),
            "doi:10.7910/DVN/AAA111:run.r"
        );
        assert_eq!(records[0].category, ErrorCategory::Success);
        assert_eq!(records[1].category, ErrorCategory::Library);
    }

    #[test]
    fn rejects_rows_outside_dataset_tree() {
        let dir = TempDir::new().unwrap();
        let path = write_results_db(&dir, &[("/tmp/stray.R", "success")]);
        assert!(read_control_scripts(&path).is_err());
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_control_scripts(&dir.path().join("absent.db")).is_err());
    }
}
