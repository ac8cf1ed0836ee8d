//! Dataset and script identifiers.
//!
//! Datasets are keyed by their persistent identifier in the canonical
//! `doi:10.7910/DVN/ABC123` form. The raw inputs carry the identifier
//! in several encodings (filesystem slugs, container image names,
//! newline-terminated list entries); each constructor normalizes one
//! of them.

use std::fmt;
use std::path::Path;

use crate::error::{ModelError, Result};

/// Number of characters before the identifier scheme in a container
/// image name.
const CONTAINER_PREFIX_LEN: usize = 6;

/// Canonical dataset identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Doi(String);

impl Doi {
    /// Parse an identifier that is already in canonical form, trimming
    /// surrounding whitespace (metadata keys and timeout-list lines
    /// carry trailing newlines).
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidDoi(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Extract the identifier from a dataset directory path or a script
    /// path beneath one.
    ///
    /// The path segment immediately following the `datasets` component
    /// is a filesystem slug (`doi-10.7910-DVN-ABC123`): the first `-`
    /// stands for `:` and the remaining ones for `/`.
    pub fn from_dataset_path(path: &str) -> Result<Self> {
        let slug = path
            .split('/')
            .skip_while(|segment| *segment != "datasets")
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| ModelError::MissingDatasetSegment(path.to_string()))?;
        Ok(Self(expand_slug(slug)))
    }

    /// Extract the identifier from a container image name.
    ///
    /// Image names carry a fixed-width prefix, then the scheme, then a
    /// lowercased slug; the slug's case is restored on expansion.
    pub fn from_container_name(name: &str) -> Result<Self> {
        let rest = name
            .get(CONTAINER_PREFIX_LEN..)
            .filter(|rest| rest.is_ascii() && rest.len() > 3)
            .ok_or_else(|| ModelError::InvalidContainerName(name.to_string()))?;
        let (scheme, slug) = rest.split_at(3);
        let expanded = slug
            .replacen('-', ":", 1)
            .to_uppercase()
            .replace('-', "/");
        Ok(Self(format!("{scheme}{expanded}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn expand_slug(slug: &str) -> String {
    slug.replacen('-', ":", 1).replace('-', "/")
}

/// Stable per-script identifier: dataset identifier plus the
/// case-normalized base filename.
///
/// Two records describe the same script iff their identifiers are
/// string-equal.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ScriptId(String);

impl ScriptId {
    pub fn new(doi: &Doi, filename: &str) -> Self {
        let base = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filename);
        Self(format!("{}:{}", doi.as_str(), base.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
