//! Per-dataset metadata fetch from the archive API.
//!
//! Read timeouts are retried up to a hard attempt cap with no
//! backoff; every other failure (transport errors, an `ERROR` status
//! payload) is recorded in a problem side file and the dataset
//! continues with absent metadata. Downstream aggregation tolerates
//! the gap.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::blocking::Client;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use repro_model::Doi;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Per-request read timeout.
pub const READ_TIMEOUT: Duration = Duration::from_secs(7);

/// Hard cap on attempts for one identifier.
pub const MAX_ATTEMPTS: u32 = 4;

pub const DEFAULT_API_URL: &str = "https://dataverse.harvard.edu/api";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub api_url: String,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: READ_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Outcome of one identifier's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched {
        subjects: Option<Vec<String>>,
        year: Option<String>,
    },
    Failed {
        reason: String,
    },
}

pub fn build_client(options: &FetchOptions) -> Result<Client> {
    Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(FetchError::Client)
}

/// Fetch one dataset's subjects and publication year.
pub fn fetch_dataset_metadata(client: &Client, options: &FetchOptions, doi: &Doi) -> FetchOutcome {
    let url = format!(
        "{}/datasets/:persistentId",
        options.api_url.trim_end_matches('/')
    );
    let mut attempts = 0;
    loop {
        attempts += 1;
        let payload = client
            .get(&url)
            .query(&[("persistentId", doi.as_str())])
            .send()
            .and_then(|response| response.json::<Value>());
        match payload {
            Ok(payload) => return decode_payload(&payload, doi),
            Err(error) if error.is_timeout() && attempts < options.max_attempts => {
                warn!(%doi, attempts, "read timeout, retrying");
            }
            Err(error) => {
                let reason = if error.is_timeout() {
                    "timeout".to_string()
                } else {
                    error.to_string()
                };
                return FetchOutcome::Failed { reason };
            }
        }
    }
}

/// Decode the archive's dataset payload.
pub fn decode_payload(payload: &Value, doi: &Doi) -> FetchOutcome {
    if payload.get("status").and_then(Value::as_str) == Some("ERROR") {
        return FetchOutcome::Failed {
            reason: "possible incorrect permissions".to_string(),
        };
    }
    let Some(data) = payload.get("data") else {
        return FetchOutcome::Failed {
            reason: "missing data in response".to_string(),
        };
    };
    let year = data
        .get("publicationDate")
        .and_then(Value::as_str)
        .map(|date| date.chars().take(4).collect());
    let mut subjects = None;
    match data
        .pointer("/latestVersion/metadataBlocks/citation/fields")
        .and_then(Value::as_array)
    {
        Some(fields) => {
            for field in fields {
                if field.get("typeName").and_then(Value::as_str) == Some("subject")
                    && let Some(values) = field.get("value").and_then(Value::as_array)
                {
                    subjects = Some(
                        values
                            .iter()
                            .filter_map(|value| value.as_str().map(str::to_string))
                            .collect(),
                    );
                }
            }
        }
        None => {
            warn!(%doi, "dataset payload has no latest-version metadata");
        }
    }
    FetchOutcome::Fetched { subjects, year }
}

/// Fetch metadata for every identifier, recording failures in the
/// problem file. The result map matches the analysis input format:
/// identifier to `[subjects, year]`.
pub fn fetch_all(
    dois: &[Doi],
    options: &FetchOptions,
    problem_file: &Path,
) -> Result<Map<String, Value>> {
    let client = build_client(options)?;
    let progress = ProgressBar::new(dois.len() as u64);
    let mut results = Map::new();
    let mut failures = 0usize;
    for doi in dois {
        match fetch_dataset_metadata(&client, options, doi) {
            FetchOutcome::Fetched { subjects, year } => {
                debug!(%doi, "fetched metadata");
                results.insert(doi.to_string(), json!([subjects, year]));
            }
            FetchOutcome::Failed { reason } => {
                warn!(%doi, reason, "metadata fetch failed");
                record_problem(problem_file, doi, &reason)?;
                results.insert(doi.to_string(), json!([Value::Null, Value::Null]));
                failures += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish();
    info!(
        fetched = results.len() - failures,
        failures, "metadata fetch complete"
    );
    Ok(results)
}

/// Write the accumulated metadata map as JSON.
pub fn write_metadata_json(path: &Path, results: &Map<String, Value>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&Value::Object(results.clone()))?;
    std::fs::write(path, rendered).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn record_problem(path: &Path, doi: &Doi, reason: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    writeln!(file, "{doi} {reason}").map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doi() -> Doi {
        Doi::parse("doi:10.7910/DVN/ABC123").unwrap()
    }

    #[test]
    fn decodes_subjects_and_year() {
        let payload = json!({
            "status": "OK",
            "data": {
                "publicationDate": "2019-04-01",
                "latestVersion": {
                    "metadataBlocks": {
                        "citation": {
                            "fields": [
                                {"typeName": "title", "value": "x"},
                                {"typeName": "subject", "value": ["Law", "Physics"]},
                            ]
                        }
                    }
                }
            }
        });
        let outcome = decode_payload(&payload, &doi());
        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                subjects: Some(vec!["Law".to_string(), "Physics".to_string()]),
                year: Some("2019".to_string()),
            }
        );
    }

    #[test]
    fn error_status_is_a_failure() {
        let payload = json!({"status": "ERROR", "message": "not authorized"});
        assert!(matches!(
            decode_payload(&payload, &doi()),
            FetchOutcome::Failed { .. }
        ));
    }

    #[test]
    fn missing_latest_version_keeps_year() {
        let payload = json!({
            "status": "OK",
            "data": {"publicationDate": "2020-01-01"}
        });
        assert_eq!(
            decode_payload(&payload, &doi()),
            FetchOutcome::Fetched {
                subjects: None,
                year: Some("2020".to_string()),
            }
        );
    }

    #[test]
    fn problem_file_accumulates_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("problems.txt");
        record_problem(&path, &doi(), "timeout").unwrap();
        record_problem(&path, &doi(), "not authorized").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "doi:10.7910/DVN/ABC123 timeout\ndoi:10.7910/DVN/ABC123 not authorized\n"
        );
    }
}
