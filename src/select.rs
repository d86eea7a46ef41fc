//! Selection of files for shrouding
//!
//! Decides which files a shroud walk will touch: the path must match one
//! of the configured glob patterns, must not be a directory, and must
//! not already carry the `.shroud` marker.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError};
use std::path::Path;

/// A compiled set of glob patterns.
///
/// A path matches the set when any single pattern matches it. The empty
/// set matches nothing, which makes an absent or empty pattern list a
/// valid no-op configuration.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: Vec<glob::Pattern>,
}

impl PatternSet {
    /// Compile a list of glob pattern strings.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    ShroudError::with_kind_and_source(
                        ErrorCategory::User,
                        ErrorKind::ConfigInvalid,
                        format!("invalid glob pattern {:?}: {}", p, e),
                        e,
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns: compiled })
    }

    /// The set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern in the set matches the path text.
    ///
    /// Matching follows shell glob tradition: `*` matches any run of
    /// characters including path separators, `?` matches exactly one
    /// character. Patterns are matched against the whole path as text,
    /// not against the file name alone.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(text))
    }
}

/// Decide whether `path` should be shrouded.
///
/// Directories and files already carrying the marker suffix are never
/// selected, whatever the patterns say. The path is matched as walked,
/// except that a leading `./` component is dropped so patterns behave
/// the same whether the walk was rooted at `.` or at a named directory.
/// Paths that are not valid UTF-8 cannot be matched and are never
/// selected.
pub fn should_shroud(path: &Path, patterns: &PatternSet) -> bool {
    if path.is_dir() {
        return false;
    }
    if envelope::is_shrouded_name(path) {
        return false;
    }
    let normalized = path.strip_prefix(".").unwrap_or(path);
    match normalized.to_str() {
        Some(text) => patterns.matches(text),
        None => false,
    }
}
