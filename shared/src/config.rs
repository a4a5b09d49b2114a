//! Configuration persistence utilities
//!
//! Loads and saves TOML documents (chart settings, the schedule book) under
//! the platform config directory.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error while reading/writing config
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the base configuration directory for the planner
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "time-circle", "time-circle")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the file path for a named document inside `dir`
pub fn document_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.toml", name))
}

/// Load a named document from the default config directory
///
/// Returns `None` if the file doesn't exist yet.
pub fn load_config<T: DeserializeOwned>(name: &str) -> Result<Option<T>, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    load_config_from(&dir, name)
}

/// Load a named document from `dir`
///
/// Returns `None` if the file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_config_from<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, ConfigError> {
    let path = document_path(dir, name);

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let value: T = toml::from_str(&contents)?;
    log::debug!("Loaded {} from {}", name, path.display());
    Ok(Some(value))
}

/// Save a named document into the default config directory
pub fn save_config<T: Serialize>(name: &str, value: &T) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(&dir, name, value)
}

/// Save a named document into `dir`, creating the directory if needed
pub fn save_config_to<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), ConfigError> {
    fs::create_dir_all(dir)?;

    let path = document_path(dir, name);
    let contents = toml::to_string_pretty(value)?;
    fs::write(&path, contents)?;
    log::debug!("Saved {} to {}", name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestDocument {
        name: String,
        value: i32,
    }

    #[test]
    fn test_document_path() {
        let path = document_path(Path::new("/tmp/planner"), "settings");
        assert!(path.to_string_lossy().ends_with("settings.toml"));
    }

    #[test]
    fn test_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<TestDocument> = load_config_from(dir.path(), "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let doc = TestDocument {
            name: "plan".to_string(),
            value: 15,
        };
        save_config_to(dir.path(), "doc", &doc).unwrap();

        let loaded: Option<TestDocument> = load_config_from(dir.path(), "doc").unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(document_path(dir.path(), "bad"), "name = ").unwrap();

        let result: Result<Option<TestDocument>, _> = load_config_from(dir.path(), "bad");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
