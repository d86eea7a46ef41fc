//! On-disk envelope for shrouded files
//!
//! A shrouded file consists of a plaintext header line followed by the
//! encryption token hard-wrapped at a fixed column width:
//!
//! ```text
//! File content encrypted with Shroud v1.0.0
//! 3vpVL1fbNyPZYUCServUbMZcKLkP0ZSBHSCky4t59vifQyOB1akk3SBqtQ8HeBpc
//! qm0tA52Yp8qZqn3gzGmQzw
//! ```
//!
//! The header line identifies the file to humans and tools; it is never
//! encrypted and is stripped before decryption. Wrapping only inserts
//! newlines, so joining the body lines restores the token exactly.
//!
//! This module also owns the `.shroud` file name marker and the helpers
//! that translate between plain and shrouded names.

use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError};
use std::path::{Path, PathBuf};

/// On-disk format version advertised in the header line.
pub const SHROUD_VERSION: &str = "1.0.0";

/// Header line prepended to every shrouded file, including the
/// terminating newline.
pub const HEADER_LINE: &str = "File content encrypted with Shroud v1.0.0\n";

/// Suffix marking shrouded files.
pub const SHROUD_SUFFIX: &str = ".shroud";

/// Column width the token is wrapped at.
const WRAP_WIDTH: usize = 64;

/// Hard-wrap a token at [`WRAP_WIDTH`] columns.
///
/// Wrapping is purely positional: a newline is inserted after every 64th
/// character regardless of content, and there is no trailing newline
/// after the last line. [`unwrap`] is the exact inverse.
pub fn wrap(token: &str) -> String {
    let mut wrapped = String::with_capacity(token.len() + token.len() / WRAP_WIDTH + 1);
    for (i, ch) in token.chars().enumerate() {
        if i > 0 && i % WRAP_WIDTH == 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }
    wrapped
}

/// Remove the newlines inserted by [`wrap`], restoring the contiguous
/// token.
///
/// The token alphabet is not validated here; foreign characters surface
/// as a decode failure in the crypto layer.
pub fn unwrap(wrapped: &str) -> String {
    wrapped.chars().filter(|&c| c != '\n').collect()
}

/// Assemble the full envelope: header line plus wrapped token.
pub fn encode(token: &str) -> String {
    let wrapped = wrap(token);
    let mut enveloped = String::with_capacity(HEADER_LINE.len() + wrapped.len());
    enveloped.push_str(HEADER_LINE);
    enveloped.push_str(&wrapped);
    enveloped
}

/// Extract the token from an envelope.
///
/// Everything up to and including the first newline is the header and is
/// discarded without further inspection; the remainder is unwrapped into
/// the token. Fails with [`ErrorKind::EnvelopeInvalid`] when no newline
/// is present or when the body is not text.
pub fn decode(enveloped: &[u8]) -> Result<String> {
    let newline = enveloped.iter().position(|&b| b == b'\n').ok_or_else(|| {
        ShroudError::with_kind(
            ErrorCategory::User,
            ErrorKind::EnvelopeInvalid,
            "no header line found; input unrecognized as shrouded data",
        )
    })?;
    let body = std::str::from_utf8(&enveloped[newline + 1..]).map_err(|e| {
        ShroudError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::EnvelopeInvalid,
            "envelope body is not text",
            e,
        )
    })?;
    Ok(unwrap(body))
}

/// Whether the file name carries the [`SHROUD_SUFFIX`] marker.
///
/// Names that are not valid UTF-8 cannot carry the marker and report
/// false.
pub fn is_shrouded_name(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.ends_with(SHROUD_SUFFIX),
        None => false,
    }
}

/// The name a file takes on when shrouded: the original name with the
/// marker suffix appended (`a.txt` becomes `a.txt.shroud`).
///
/// Returns `None` for paths without a final component.
pub fn shrouded_name(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_name()?.to_os_string();
    name.push(SHROUD_SUFFIX);
    Some(path.with_file_name(name))
}

/// The name a shrouded file returns to when unshrouded: exactly the
/// marker suffix stripped (`a.txt.shroud` becomes `a.txt`).
///
/// Returns `None` when the name does not end with the marker, or when
/// stripping it would leave nothing (a file literally named `.shroud`).
pub fn plain_name(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(SHROUD_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(stem))
}
