//! User settings persisted as TOML.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quill_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};

/// Settings file contents.
///
/// Stored in the user's config directory; every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Auto-save behavior.
    pub autosave: AutoSaveConfig,
}

impl Settings {
    /// Load settings from `path`, or the default path when `None`.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and also yields defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!("Ignoring settings file: {error:#}");
                Self::default()
            }
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }

    /// Default settings file location.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "Quill", "quill")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_persistence::FailurePolicy;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[autosave]\nquiet_period_ms = 1500\n").unwrap();

        let settings = Settings::load(Some(&path));
        assert_eq!(settings.autosave.quiet_period_ms, 1500);
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.on_failure, FailurePolicy::Forget);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "autosave = 12").unwrap();

        assert!(Settings::load_from(&path).is_err());
        assert_eq!(Settings::load(Some(&path)), Settings::default());
    }

    #[test]
    fn test_printed_toml_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut settings = Settings::default();
        settings.autosave.max_wait_ms = Some(10_000);
        settings.autosave.on_failure = FailurePolicy::Rearm;

        std::fs::write(&path, settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }
}
