//! Persisted user settings
//!
//! The only preference is the download directory. It lives in a small JSON file
//! in the working directory and is re-read every time it is needed, since the
//! settings menu can change it at any point of the session.

use crate::utils::error::RustgrabError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Conventional name of the settings file
pub const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Download location. Empty means the current working directory.
    pub download_path: String,
}

impl AppSettings {
    /// The configured download path, if any
    pub fn custom_path(&self) -> Option<&Path> {
        let trimmed = self.download_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Path::new(trimmed))
        }
    }
}

/// Reads and writes [`AppSettings`] from a single JSON file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SETTINGS_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults on a missing or unreadable file
    pub fn load(&self) -> AppSettings {
        if !self.path.exists() {
            return AppSettings::default();
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings file {:?}: {}", self.path, e);
                AppSettings::default()
            }
        }
    }

    fn try_load(&self) -> Result<AppSettings, RustgrabError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist settings. Failures are reported and turned into `false`.
    pub fn save(&self, settings: &AppSettings) -> bool {
        match self.try_save(settings) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save settings to {:?}: {}", self.path, e);
                eprintln!(
                    "{}",
                    console::style(format!("Error saving settings: {}", e)).red()
                );
                false
            }
        }
    }

    /// Write pretty JSON to a sibling temp file and move it over the real one
    pub fn try_save(&self, settings: &AppSettings) -> Result<(), RustgrabError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        settings.serialize(&mut ser)?;
        buf.push(b'\n');

        let tmp = self.temp_path();
        fs::write(&tmp, &buf)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!("Settings saved to {:?}", self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| SETTINGS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
