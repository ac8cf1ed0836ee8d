//! Treatment-condition run reports.
//!
//! The treatment evaluation ran on several machines, each writing its
//! own SQLite database with one JSON report per processed dataset. A
//! report nests a per-script breakdown under `Individual Scripts` and
//! run-level facts (container name, build time) under
//! `Additional Information`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use repro_model::{Doi, SUCCESS, ScriptRecord};

use crate::error::{IngestError, Result};

/// One dataset's run report, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub doi: Doi,
    /// End-to-end build/execution time in seconds, when recorded.
    pub build_secs: Option<f64>,
    /// Per-script outcomes; empty when the run recorded no scripts.
    pub scripts: Vec<ReportScript>,
}

/// One script entry inside a run report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportScript {
    pub filename: String,
    /// First recorded error, or the success sentinel.
    pub error: String,
    pub timed_out: bool,
}

/// Find every `*app.db` results database under `dir`, sorted by path.
pub fn collect_run_databases(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut databases = Vec::new();
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
            .map(|name| name.ends_with("app.db"))
            .unwrap_or(false);
        if matches {
            databases.push(entry.into_path());
        }
    }
    databases.sort();
    Ok(databases)
}

/// Read every report document from one run database.
///
/// Malformed documents are skipped with a warning rather than failing
/// the run; the worst case is one missing dataset row downstream.
pub fn read_run_reports(path: &Path) -> Result<Vec<RunReport>> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| IngestError::database(path, e))?;
    let mut statement = conn
        .prepare("SELECT report FROM dataset")
        .map_err(|e| IngestError::database(path, e))?;
    let rows = statement
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| IngestError::database(path, e))?;

    let mut reports = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| IngestError::database(path, e))?;
        match parse_report(&raw) {
            Some(report) => reports.push(report),
            None => {
                warn!(path = %path.display(), "skipping malformed run report");
            }
        }
    }
    Ok(reports)
}

/// Read and merge the reports of every database under `dir`.
///
/// The evaluation occasionally processed a dataset twice on different
/// machines; the first report for an identifier wins.
pub fn read_all_run_reports(dir: &Path) -> Result<Vec<RunReport>> {
    let mut seen = BTreeSet::new();
    let mut merged = Vec::new();
    let mut duplicates = 0usize;
    for database in collect_run_databases(dir)? {
        for report in read_run_reports(&database)? {
            if seen.insert(report.doi.clone()) {
                merged.push(report);
            } else {
                duplicates += 1;
            }
        }
    }
    debug!(
        dir = %dir.display(),
        count = merged.len(),
        duplicates,
        "merged treatment run reports"
    );
    Ok(merged)
}

/// Normalize the reports' script breakdowns into script records.
/// Reports with no recorded scripts contribute nothing.
pub fn script_records(reports: &[RunReport]) -> Vec<ScriptRecord> {
    let mut records = Vec::new();
    for report in reports {
        for script in &report.scripts {
            records.push(ScriptRecord::new(
                report.doi.clone(),
                &script.filename,
                script.error.clone(),
            ));
        }
    }
    records
}

fn parse_report(raw: &str) -> Option<RunReport> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let info = value.get("Additional Information")?;
    let container = info.get("Container Name")?.as_str()?;
    let doi = Doi::from_container_name(container).ok()?;
    let build_secs = info.get("Build Time").and_then(Value::as_f64);

    let mut scripts = Vec::new();
    if let Some(Value::Object(entries)) = value.get("Individual Scripts") {
        for (filename, entry) in entries {
            let error = match entry.get("Errors") {
                Some(Value::Array(errors)) if !errors.is_empty() => errors[0]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| errors[0].to_string()),
                _ => SUCCESS.to_string(),
            };
            let timed_out = entry
                .get("Timed Out")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            scripts.push(ReportScript {
                filename: filename.clone(),
                error,
                timed_out,
            });
        }
    }

    Some(RunReport {
        doi,
        build_secs,
        scripts,
    })
}
