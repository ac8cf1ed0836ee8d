//! Named-placeholder template rendering.
//!
//! Every published table is a fixed template string with
//! `UPPER_SNAKE` tokens. Rendering substitutes values by token name
//! only; tokens are applied in the caller's order, so a token that is
//! a substring of another must be substituted after it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Substitute each `(token, value)` pair into the template, in order.
/// Unknown tokens in the template are left untouched.
pub fn render<K: AsRef<str>>(template: &str, substitutions: &[(K, String)]) -> String {
    let mut rendered = template.to_string();
    for (token, value) in substitutions {
        rendered = rendered.replace(token.as_ref(), value);
    }
    rendered
}

/// Percent formatting used across the published tables.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}")
}

/// Significant-digit formatting for ratios ("2.34x" style values).
pub fn format_sig(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let order = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - order).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Write one markdown insert, creating the directory as needed.
pub fn write_insert(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create insert directory {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "wrote insert");
    Ok(path)
}
