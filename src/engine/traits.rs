use crate::engine::models::EngineOptions;
use async_trait::async_trait;
use thiserror::Error;

/// Stage a download is in, as far as the terminal is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Downloading,
    /// Raw transfer is over, the engine is muxing or transcoding
    Converting,
    Done,
}

/// One progress notification from the engine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressUpdate {
    pub phase: Phase,
    /// Percentage in 0..=100. `None` when the engine reported something unparsable.
    pub percent: Option<f64>,
    pub filename: Option<String>,
}

impl ProgressUpdate {
    pub fn downloading(percent: Option<f64>, filename: Option<String>) -> Self {
        Self {
            phase: Phase::Downloading,
            percent,
            filename,
        }
    }

    pub fn converting() -> Self {
        Self {
            phase: Phase::Converting,
            percent: Some(100.0),
            filename: None,
        }
    }
}

/// Receives progress while an engine run is in flight
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, update: &ProgressUpdate);
}

/// Failure of one engine run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine itself reported that the download failed (unsupported URL, network, ...)
    #[error("{0}")]
    Download(String),

    /// Anything else: engine missing, spawn failure, broken pipe
    #[error("{0}")]
    Unexpected(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Unexpected(e.to_string())
    }
}

/// Core trait for the external download engine
///
/// Keeps the orchestration independent of how the media is actually fetched,
/// so it can be driven by a scripted engine in tests.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Short identifier used in logs
    fn id(&self) -> &'static str;

    /// Download `url` with `options`, feeding progress to `observer`
    async fn run(
        &self,
        url: &str,
        options: &EngineOptions,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(), EngineError>;
}
