//! External download engine

pub mod models;
pub mod traits;
pub mod ytdlp;

pub use models::{EngineOptions, PostProcessor};
pub use traits::{Engine, EngineError, Phase, ProgressObserver, ProgressUpdate};
pub use ytdlp::YtDlpEngine;
