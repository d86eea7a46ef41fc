//! Password file loading
//!
//! The password file holds the key in its textual form and nothing else.
//! Only surrounding whitespace (typically a trailing newline left by an
//! editor or shell redirect) is tolerated; the text itself is opaque
//! here and is interpreted by the crypto layer.

use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError, read_error};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Read key text from the password file at `path`.
///
/// Returns the trimmed key text wrapped in `Zeroizing` so it is wiped
/// from memory when dropped. Intermediate buffers are wiped as well.
pub fn load_key_text(path: &Path) -> Result<Zeroizing<String>> {
    let raw = Zeroizing::new(fs::read(path).map_err(|e| read_error(path, e))?);
    let text = std::str::from_utf8(&raw).map_err(|e| {
        ShroudError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::KeyInvalid,
            format!("password file {} does not contain text", path.display()),
            e,
        )
    })?;
    Ok(Zeroizing::new(text.trim().to_string()))
}
