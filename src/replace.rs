//! Pattern-based text substitution over a set of files.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::Result;

/// Outcome of applying one substitution to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceResult {
    /// Path as given, relative to the root the substitution ran in
    pub file: String,
    pub has_changed: bool,
}

/// Replace every match of `pattern` with `replacement` in each file under `root`.
///
/// `replacement` follows [`Regex::replace_all`] syntax, so `${1}` refers to a
/// capture group. Files are only rewritten when their content changes. Files
/// that do not exist produce no result.
pub fn apply_replacements(
    root: &Path,
    files: &[String],
    pattern: &Regex,
    replacement: &str,
) -> Result<Vec<ReplaceResult>> {
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let path = root.join(file);
        if !path.is_file() {
            continue;
        }

        let content = fs::read_to_string(&path)?;
        let updated = pattern.replace_all(&content, replacement);
        let has_changed = updated != content;
        if has_changed {
            fs::write(&path, updated.as_bytes())?;
        }

        results.push(ReplaceResult {
            file: file.clone(),
            has_changed,
        });
    }

    Ok(results)
}
