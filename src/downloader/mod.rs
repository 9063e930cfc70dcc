//! Option building, progress relay and download orchestration

pub mod options;
pub mod orchestrator;
pub mod progress;

// Re-export for convenience
pub use options::{
    build_audio_options, build_video_options, resolve_destination, AudioQuality, Destination,
    DownloadRequest, MediaKind, VideoQuality,
};
pub use orchestrator::{DownloadOutcome, Downloader};
pub use progress::{ProgressRelay, ProgressState};
