//! Shroud - recursive, pattern-selected file encryption for directory trees
//!
//! Walks a directory tree and encrypts every text file matching the glob
//! patterns configured in `shroud.toml`, renaming each with a `.shroud`
//! suffix; a second walk decrypts them back. Files are protected with
//! NaCl secretbox (XSalsa20Poly1305) under a pre-shared key held in a
//! password file.

#![forbid(unsafe_code)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod keycrypt;
pub mod keyfile;
pub mod select;
pub mod walk;

pub use config::load_config;
pub use error::{ErrorCategory, ErrorKind, Result, ShroudError};
pub use keycrypt::Key;
pub use keyfile::load_key_text;
pub use select::PatternSet;
pub use walk::{shroud_path, unshroud_path};
