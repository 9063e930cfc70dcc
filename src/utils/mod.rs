//! Utility modules for error handling, settings and tool discovery

pub mod bundle_paths;
pub mod config;
pub mod error;

// Re-export for convenience
pub use bundle_paths::{find_bundled_ffmpeg_dir, find_ytdlp};
pub use config::{AppSettings, SettingsStore, SETTINGS_FILE};
pub use error::RustgrabError;
