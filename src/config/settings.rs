//! Application settings.
//!
//! Settings live in `settings.json` under the XDG config directory
//! (`~/.config/skitter` on Linux) or in a file passed with `--config`.
//! Command-line flags override whatever the file says.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::DEFAULT_TIMEOUT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-attempt connection timeout in milliseconds.
    pub timeout_ms: u64,
    /// Only report open ports.
    pub open_only: bool,
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            open_only: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    ///
    /// A missing file at the default location means defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Ok(file) if file.exists() => Self::load_from(&file),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!(error = %e, "using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Path of the settings file in the XDG config directory.
    pub fn default_path() -> ConfigResult<PathBuf> {
        let project =
            ProjectDirs::from("dev", "skitter", "skitter").ok_or(ConfigError::DirectoryNotFound)?;
        Ok(project.config_dir().join(SETTINGS_FILE))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.timeout_ms, 300);
        assert_eq!(settings.timeout(), Duration::from_millis(300));
        assert!(!settings.open_only);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_load_full_file() {
        let file = settings_file(r#"{"timeout_ms": 1500, "open_only": true, "log_level": "debug"}"#);
        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.timeout_ms, 1500);
        assert!(settings.open_only);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = settings_file(r#"{"open_only": true}"#);
        let settings = Settings::load_from(file.path()).unwrap();

        assert!(settings.open_only);
        assert_eq!(settings.timeout_ms, 300);
    }

    #[test]
    fn test_invalid_json() {
        let file = settings_file("timeout_ms = 5");
        assert!(matches!(
            Settings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            Settings::load(Some(missing.as_path())),
            Err(ConfigError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
