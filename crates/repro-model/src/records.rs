//! Normalized per-script and per-dataset records.
//!
//! Records are built once during ingestion and never mutated; every
//! downstream transformation is a pure pass producing new tables.

use std::collections::BTreeSet;
use std::fmt;

use crate::category::{ErrorCategory, categorize};
use crate::ids::{Doi, ScriptId};

/// Which arm of the study a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Condition {
    /// Scripts executed without the reproducibility tool.
    Control,
    /// Scripts executed with the reproducibility tool.
    Treatment,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Control => "control",
            Condition::Treatment => "treatment",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed script under one condition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptRecord {
    pub script_id: ScriptId,
    pub doi: Doi,
    /// Raw error message, or a sentinel (`success` / `timed out`).
    pub error: String,
    pub category: ErrorCategory,
}

impl ScriptRecord {
    /// Build a record from the raw filename and error message; the
    /// category is derived once at construction.
    pub fn new(doi: Doi, filename: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        let script_id = ScriptId::new(&doi, filename);
        let category = categorize(&error);
        Self {
            script_id,
            doi,
            error,
            category,
        }
    }
}

/// One dataset under one condition, aggregated from its scripts plus
/// externally supplied metadata and timing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatasetRecord {
    pub doi: Doi,
    /// Publication year, when the archive metadata provided one.
    pub year: Option<String>,
    /// Subject tags from the archive metadata.
    pub subjects: BTreeSet<String>,
    /// Wall-clock execution time, when recorded.
    pub elapsed_secs: Option<f64>,
    pub timed_out: bool,
    /// True iff every script under this dataset succeeded; `None` when
    /// no script breakdown was recorded.
    pub clean: Option<bool>,
}

impl DatasetRecord {
    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }
}
