//! Rustgrab library

pub mod app;
pub mod downloader;
pub mod engine;
pub mod menu;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{DownloadOutcome, DownloadRequest, Downloader, MediaKind};
pub use engine::{Engine, EngineError, EngineOptions, YtDlpEngine};
pub use utils::{AppSettings, RustgrabError, SettingsStore};
