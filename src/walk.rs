//! Recursive tree walks
//!
//! Drives the per-file transforms over every regular file under a root
//! directory, in no particular order. The first failure aborts the walk
//! and is reported; files already transformed by then stay transformed.
//! Symlinks are not followed, and anything that is not a regular file is
//! skipped.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError};
use crate::file_ops;
use crate::keycrypt::Key;
use crate::select::{self, PatternSet};
use std::io;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Shroud every file under `root` selected by the pattern set
///
/// Returns the number of files shrouded. Files already carrying the
/// `.shroud` marker are never re-encrypted, so running this twice over
/// the same tree is harmless.
pub fn shroud_path(root: &Path, key: &Key, patterns: &PatternSet) -> Result<usize> {
    let mut shrouded = 0usize;
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !select::should_shroud(path, patterns) {
            continue;
        }
        file_ops::shroud_file(path, key)?;
        shrouded += 1;
    }
    info!(root = %root.display(), count = shrouded, "shroud walk complete");
    Ok(shrouded)
}

/// Unshroud every `.shroud` file under `root`
///
/// Returns the number of files unshrouded. Only regular files are
/// transformed; a directory whose name happens to carry the marker is
/// left alone (its contents are still walked).
pub fn unshroud_path(root: &Path, key: &Key) -> Result<usize> {
    let mut unshrouded = 0usize;
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !envelope::is_shrouded_name(path) {
            continue;
        }
        file_ops::unshroud_file(path, key)?;
        unshrouded += 1;
    }
    info!(root = %root.display(), count = unshrouded, "unshroud walk complete");
    Ok(unshrouded)
}

fn walk_error(err: walkdir::Error) -> ShroudError {
    let category = match err.io_error() {
        Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => ErrorCategory::User,
        _ => ErrorCategory::Internal,
    };
    let msg = match err.path() {
        Some(path) => format!("failed to walk {}", path.display()),
        None => "failed to walk directory tree".to_string(),
    };
    ShroudError::with_kind_and_source(category, ErrorKind::Io, msg, err)
}
