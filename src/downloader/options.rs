//! Mapping menu selections to engine options

use crate::engine::{EngineOptions, PostProcessor};
use crate::utils::config::AppSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Filename template used for every download
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Video quality options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoQuality {
    UltraHd,
    #[default]
    FullHd,
    Hd,
    Sd,
    Low,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 5] = [
        VideoQuality::UltraHd,
        VideoQuality::FullHd,
        VideoQuality::Hd,
        VideoQuality::Sd,
        VideoQuality::Low,
    ];

    /// Menu label
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::UltraHd => "4k",
            VideoQuality::FullHd => "1080p",
            VideoQuality::Hd => "720p",
            VideoQuality::Sd => "480p",
            VideoQuality::Low => "360p",
        }
    }

    /// Target vertical resolution
    pub fn height(&self) -> u32 {
        match self {
            VideoQuality::UltraHd => 2160,
            VideoQuality::FullHd => 1080,
            VideoQuality::Hd => 720,
            VideoQuality::Sd => 480,
            VideoQuality::Low => 360,
        }
    }

    /// Parse a menu label; anything unknown means 1080p
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(label.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio quality options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioQuality {
    High,
    #[default]
    Medium,
    Low,
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 3] = [AudioQuality::High, AudioQuality::Medium, AudioQuality::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioQuality::High => "High (320kbps)",
            AudioQuality::Medium => "Medium (192kbps)",
            AudioQuality::Low => "Low (128kbps)",
        }
    }

    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            AudioQuality::High => 320,
            AudioQuality::Medium => 192,
            AudioQuality::Low => 128,
        }
    }

    /// Parse a menu label; anything unknown means 192kbps
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == label.trim())
            .unwrap_or_default()
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video { quality: VideoQuality, mute_audio: bool },
    Audio { quality: AudioQuality },
}

/// One download, built from the menu answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: MediaKind,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into().trim().to_string(),
            kind,
        }
    }

    /// Label shown in the start banner
    pub fn description(&self) -> String {
        match self.kind {
            MediaKind::Video {
                quality,
                mute_audio: true,
            } => format!("Video ({}) [Muted]", quality),
            MediaKind::Video { quality, .. } => format!("Video ({})", quality),
            MediaKind::Audio { .. } => "Audio MP3".to_string(),
        }
    }

    /// Engine options for this request against the current settings
    pub fn build_options(&self, settings: &AppSettings) -> EngineOptions {
        self.options_for(&resolve_destination(settings))
    }

    /// Engine options for this request writing to `destination`
    pub fn options_for(&self, destination: &Destination) -> EngineOptions {
        match self.kind {
            MediaKind::Video {
                quality,
                mute_audio,
            } => build_video_options(quality, mute_audio, destination),
            MediaKind::Audio { quality } => build_audio_options(quality, destination),
        }
    }
}

/// Where a download will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The configured directory (it exists, possibly just created)
    Custom(PathBuf),
    /// No directory configured
    CurrentDir,
    /// A directory was configured but could not be created
    FellBack { requested: PathBuf, reason: String },
}

impl Destination {
    /// Directory to hand to the engine
    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Custom(path) => Some(path),
            Destination::CurrentDir | Destination::FellBack { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Destination::FellBack { .. })
    }

    /// Why the configured directory is not being used, if it isn't
    pub fn fallback_notice(&self) -> Option<String> {
        match self {
            Destination::FellBack { requested, reason } => Some(format!(
                "Could not use {} ({}), saving to the current folder instead",
                requested.display(),
                reason
            )),
            _ => None,
        }
    }
}

/// Resolve the configured download path, creating it when missing
pub fn resolve_destination(settings: &AppSettings) -> Destination {
    let Some(path) = settings.custom_path() else {
        return Destination::CurrentDir;
    };

    if path.is_dir() {
        return Destination::Custom(path.to_path_buf());
    }

    match std::fs::create_dir_all(path) {
        Ok(()) => Destination::Custom(path.to_path_buf()),
        Err(e) => {
            warn!(
                "Download path {:?} unusable ({}), using the current folder",
                path, e
            );
            Destination::FellBack {
                requested: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

fn base_options(format: String, destination: &Destination) -> EngineOptions {
    EngineOptions {
        format,
        merge_output_format: None,
        output_template: OUTPUT_TEMPLATE.to_string(),
        no_playlist: true,
        quiet: true,
        no_warnings: true,
        home_path: destination.path().map(Path::to_path_buf),
        ffmpeg_location: None,
        postprocessors: Vec::new(),
    }
}

/// Options for a video download
pub fn build_video_options(
    quality: VideoQuality,
    mute_audio: bool,
    destination: &Destination,
) -> EngineOptions {
    let height = quality.height();

    let (format, container) = if mute_audio {
        (format!("bestvideo[height={h}]/bestvideo", h = height), "mp4")
    } else {
        let container = if quality == VideoQuality::UltraHd {
            "mkv"
        } else {
            "mp4"
        };
        (
            format!(
                "bestvideo[height={h}]+bestaudio/best[height={h}]/best",
                h = height
            ),
            container,
        )
    };

    let mut options = base_options(format, destination);
    options.merge_output_format = Some(container.to_string());
    options
}

/// Options for an audio-only download, converted to mp3
pub fn build_audio_options(quality: AudioQuality, destination: &Destination) -> EngineOptions {
    let mut options = base_options("bestaudio/best".to_string(), destination);
    options.postprocessors.push(PostProcessor::ExtractAudio {
        codec: "mp3".to_string(),
        bitrate_kbps: quality.bitrate_kbps(),
    });
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_video_quality_heights() {
        let expected = [
            ("4k", 2160),
            ("1080p", 1080),
            ("720p", 720),
            ("480p", 480),
            ("360p", 360),
        ];
        for (label, height) in expected {
            let quality = VideoQuality::from_label(label);
            assert_eq!(quality.as_str(), label);
            assert_eq!(quality.height(), height);
        }
    }

    #[test]
    fn test_unknown_video_quality_is_1080p() {
        assert_eq!(VideoQuality::from_label("8k"), VideoQuality::FullHd);
        assert_eq!(VideoQuality::from_label(""), VideoQuality::FullHd);
    }

    #[test]
    fn test_video_with_audio_containers() {
        for quality in VideoQuality::ALL {
            let opts = build_video_options(quality, false, &Destination::CurrentDir);
            let h = quality.height();
            assert_eq!(
                opts.format,
                format!("bestvideo[height={h}]+bestaudio/best[height={h}]/best")
            );
            let expected = if quality == VideoQuality::UltraHd { "mkv" } else { "mp4" };
            assert_eq!(opts.merge_output_format.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_muted_video_is_always_mp4() {
        for quality in VideoQuality::ALL {
            let opts = build_video_options(quality, true, &Destination::CurrentDir);
            assert_eq!(
                opts.format,
                format!("bestvideo[height={}]/bestvideo", quality.height())
            );
            assert_eq!(opts.merge_output_format.as_deref(), Some("mp4"));
            assert!(opts.postprocessors.is_empty());
        }
    }

    #[test]
    fn test_common_flags() {
        let dest = Destination::Custom(PathBuf::from("/data"));
        for opts in [
            build_video_options(VideoQuality::Hd, false, &dest),
            build_audio_options(AudioQuality::Low, &dest),
        ] {
            assert_eq!(opts.output_template, OUTPUT_TEMPLATE);
            assert!(opts.no_playlist);
            assert!(opts.quiet);
            assert!(opts.no_warnings);
            assert_eq!(opts.home_path, Some(PathBuf::from("/data")));
        }
    }

    #[test]
    fn test_audio_bitrates() {
        let expected = [
            ("High (320kbps)", 320),
            ("Medium (192kbps)", 192),
            ("Low (128kbps)", 128),
            ("Lossless", 192),
        ];
        for (label, bitrate) in expected {
            let opts = build_audio_options(AudioQuality::from_label(label), &Destination::CurrentDir);
            assert_eq!(opts.format, "bestaudio/best");
            assert_eq!(opts.audio_bitrate(), Some(bitrate));
            assert_eq!(opts.merge_output_format, None);
        }
    }

    #[test]
    fn test_resolve_unset_is_current_dir() {
        assert_eq!(
            resolve_destination(&AppSettings::default()),
            Destination::CurrentDir
        );
    }

    #[test]
    fn test_resolve_existing_dir() {
        let dir = tempdir().unwrap();
        let settings = AppSettings {
            download_path: dir.path().display().to_string(),
        };
        assert_eq!(
            resolve_destination(&settings),
            Destination::Custom(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_resolve_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("out");
        let settings = AppSettings {
            download_path: target.display().to_string(),
        };

        assert_eq!(resolve_destination(&settings), Destination::Custom(target.clone()));
        assert!(target.is_dir());
    }

    #[test]
    fn test_resolve_falls_back_when_uncreatable() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let settings = AppSettings {
            download_path: blocker.join("sub").display().to_string(),
        };

        let dest = resolve_destination(&settings);
        assert!(dest.is_fallback());
        assert_eq!(dest.path(), None);

        let notice = dest.fallback_notice().unwrap();
        assert!(notice.starts_with(&format!("Could not use {}", blocker.join("sub").display())));
        assert_eq!(Destination::CurrentDir.fallback_notice(), None);
    }

    #[test]
    fn test_request_description() {
        let muted = DownloadRequest::new(
            "https://example.com/v",
            MediaKind::Video {
                quality: VideoQuality::Hd,
                mute_audio: true,
            },
        );
        assert_eq!(muted.description(), "Video (720p) [Muted]");

        let audio = DownloadRequest::new(
            " https://example.com/v ",
            MediaKind::Audio {
                quality: AudioQuality::High,
            },
        );
        assert_eq!(audio.description(), "Audio MP3");
        assert_eq!(audio.url, "https://example.com/v");
    }
}
