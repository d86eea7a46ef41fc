//! In-place file encryption/decryption operations
//!
//! This module provides the two per-file transforms. Each rewrites the
//! file's content in place and then renames the file:
//!
//! - shroud: `a.txt` content becomes an envelope, name becomes
//!   `a.txt.shroud`
//! - unshroud: the envelope is decrypted back, name returns to `a.txt`
//!
//! The content write and the rename are separate steps, so a crash
//! between them leaves new content under the old name. Decryption
//! validates everything (marker suffix, header, token, authentication)
//! before the first byte is written, which keeps wrong-key and
//! foreign-file failures from modifying anything.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError, read_error};
use crate::keycrypt::{self, Key};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Encrypt a file in place and mark its name
///
/// Reads the text content of `path`, replaces it with the encrypted
/// envelope, and renames the file to carry the `.shroud` suffix. The
/// content must be UTF-8 text; binary files fail with
/// [`ErrorKind::NotText`] and are left untouched.
pub fn shroud_file(path: &Path, key: &Key) -> Result<()> {
    let target = envelope::shrouded_name(path).ok_or_else(|| {
        ShroudError::with_kind(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("cannot derive a shrouded name for {}", path.display()),
        )
    })?;
    let content = fs::read(path).map_err(|e| read_error(path, e))?;
    let text = String::from_utf8(content).map_err(|e| {
        ShroudError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::NotText,
            format!("{} is not a text file and cannot be shrouded", path.display()),
            e,
        )
    })?;

    let token = keycrypt::encrypt(key, text.as_bytes())
        .map_err(|e| e.with_context(format!("failed to shroud {}", path.display())))?;
    let enveloped = envelope::encode(&token);

    fs::write(path, enveloped).map_err(|e| write_error(path, e))?;
    fs::rename(path, &target).map_err(|e| rename_error(path, &target, e))?;
    debug!(path = %path.display(), "shrouded file");
    Ok(())
}

/// Decrypt a shrouded file in place and restore its name
///
/// Reads the envelope at `path`, replaces it with the decrypted
/// plaintext, and renames the file back to its unmarked name. `path`
/// must carry the `.shroud` suffix. On any failure the file keeps its
/// exact content and name.
pub fn unshroud_file(path: &Path, key: &Key) -> Result<()> {
    let target = envelope::plain_name(path).ok_or_else(|| {
        ShroudError::with_kind(
            ErrorCategory::User,
            ErrorKind::EnvelopeInvalid,
            format!("{} is not a shrouded file name", path.display()),
        )
    })?;
    let enveloped = fs::read(path).map_err(|e| read_error(path, e))?;
    let token = envelope::decode(&enveloped)
        .map_err(|e| e.with_context(format!("failed to unshroud {}", path.display())))?;
    let plaintext = keycrypt::decrypt(key, &token)
        .map_err(|e| e.with_context(format!("failed to unshroud {}", path.display())))?;

    fs::write(path, plaintext).map_err(|e| write_error(path, e))?;
    fs::rename(path, &target).map_err(|e| rename_error(path, &target, e))?;
    debug!(path = %path.display(), "unshrouded file");
    Ok(())
}

fn write_error(path: &Path, err: io::Error) -> ShroudError {
    ShroudError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::Io,
        format!("failed to write {}", path.display()),
        err,
    )
}

fn rename_error(from: &Path, to: &Path, err: io::Error) -> ShroudError {
    ShroudError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::Io,
        format!("failed to rename {} to {}", from.display(), to.display()),
        err,
    )
}
