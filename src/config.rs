//! Pattern configuration
//!
//! The configuration is a TOML document with a single recognized key:
//!
//! ```toml
//! shroud_patterns = ["*.env", "*.key", "secrets*"]
//! ```
//!
//! A document without the key yields the empty pattern set, making a
//! shroud run a no-op. Unrecognized keys are ignored.

use crate::error::{ErrorCategory, ErrorKind, Result, ShroudError, read_error};
use crate::select::PatternSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct ShroudConfig {
    #[serde(default)]
    shroud_patterns: Vec<String>,
}

/// Load the configuration file at `path` and compile its patterns.
pub fn load_config(path: &Path) -> Result<PatternSet> {
    let text = fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    parse_config(&text)
        .map_err(|e| e.with_context(format!("invalid config file {}", path.display())))
}

fn parse_config(text: &str) -> Result<PatternSet> {
    let config: ShroudConfig = toml::from_str(text).map_err(|e| {
        ShroudError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::ConfigInvalid,
            format!("TOML parse failed: {}", e),
            e,
        )
    })?;
    PatternSet::new(&config.shroud_patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_patterns_parsed() {
        let patterns = parse_config("shroud_patterns = [\"*.txt\", \"*.env\"]\n").unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.matches("a.txt"));
        assert!(patterns.matches("prod.env"));
        assert!(!patterns.matches("a.md"));
    }

    #[test]
    fn test_missing_key_yields_empty_set() {
        let patterns = parse_config("other_key = 1\n").unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_empty_document_yields_empty_set() {
        let patterns = parse_config("").unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = parse_config("shroud_patterns = [\"unterminated\n");
        let err = result.expect_err("expected TOML parse error");
        assert_eq!(err.kind, Some(ErrorKind::ConfigInvalid));
    }

    #[test]
    fn test_wrong_value_type_rejected() {
        let result = parse_config("shroud_patterns = \"*.txt\"\n");
        let err = result.expect_err("expected TOML type error");
        assert_eq!(err.kind, Some(ErrorKind::ConfigInvalid));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let result = parse_config("shroud_patterns = [\"oops[\"]\n");
        let err = result.expect_err("expected pattern compile error");
        assert_eq!(err.kind, Some(ErrorKind::ConfigInvalid));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shroud.toml");
        fs::write(&config_path, "shroud_patterns = [\"*.md\"]\n").unwrap();

        let patterns = load_config(&config_path).unwrap();
        assert!(patterns.matches("notes.md"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nope.toml");

        let result = load_config(&config_path);
        let err = result.expect_err("expected read error");
        assert_eq!(err.kind, Some(ErrorKind::Io));
        assert_eq!(err.category, ErrorCategory::User);
        assert!(err.message().contains("nope.toml"));
    }

    #[test]
    fn test_load_config_bad_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shroud.toml");
        fs::write(&config_path, "not valid toml [[[").unwrap();

        let err = load_config(&config_path).expect_err("expected parse error");
        assert_eq!(err.kind, Some(ErrorKind::ConfigInvalid));
        assert!(err.message().contains("shroud.toml"));
    }
}
