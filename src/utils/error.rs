//! Error handling for Rustgrab

use thiserror::Error;

/// Main error type for Rustgrab
#[derive(Debug, Error)]
pub enum RustgrabError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Operation cancelled by user")]
    Cancelled,
}

impl RustgrabError {
    /// Whether this error means the user asked to leave the program
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RustgrabError::Cancelled)
    }
}
