use std::error::Error as StdError;
use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// A failure the code cannot attribute to anything the user did.
    ///
    /// Internal is the fallback, not a verdict: an error lands here
    /// whenever the code cannot tell whose fault it is, so a user
    /// mistake may still surface as Internal.
    Internal,

    /// The user supplied bad input or asked for something that cannot
    /// be done.
    User,
}

/// Specific failure conditions, for callers that branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// File content is not text and cannot be shrouded.
    NotText,
    /// The on-disk envelope is malformed (missing header line, non-text
    /// body, or a file name without the marker suffix).
    EnvelopeInvalid,
    /// The encryption token could not be decoded (bad base64 or truncated).
    TokenDecode,
    /// Authentication failed due to an incorrect password or tampering
    /// or corruption.
    AuthenticationFailed,
    /// Password text does not decode to a valid key.
    KeyInvalid,
    /// The pattern configuration could not be parsed, or a glob pattern
    /// in it would not compile.
    ConfigInvalid,
    /// Interaction with the filesystem or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct ShroudError {
    /// Broad category, present on every error.
    pub category: ErrorCategory,
    /// Specific condition tag, when one applies. Callers branching on
    /// the kind must tolerate its absence.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl ShroudError {
    /// An error with a category and a display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// An error additionally tagged with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// An error tagged with a kind and carrying the underlying cause.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The display message.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Wraps this error in a higher-level message, keeping it as the
    /// source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Maps a failure to read `path` to an error, attributing missing files
/// to the user rather than to the tool.
pub(crate) fn read_error(path: &Path, err: io::Error) -> ShroudError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    ShroudError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShroudError>;
