//! Options handed to the download engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Post-processing step run by the engine after the transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostProcessor {
    /// Extract the audio track and transcode it with the conversion tool
    ExtractAudio { codec: String, bitrate_kbps: u32 },
}

/// Everything the engine needs to know for one download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Format selector expression
    pub format: String,
    /// Container used when separate streams are merged
    pub merge_output_format: Option<String>,
    /// Output filename template
    pub output_template: String,
    pub no_playlist: bool,
    pub quiet: bool,
    pub no_warnings: bool,
    /// Destination directory; `None` means the working directory
    pub home_path: Option<PathBuf>,
    /// Directory holding a bundled ffmpeg
    pub ffmpeg_location: Option<PathBuf>,
    #[serde(default)]
    pub postprocessors: Vec<PostProcessor>,
}

impl EngineOptions {
    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    /// Label for the destination shown to the user
    pub fn destination_label(&self) -> String {
        match &self.home_path {
            Some(path) => path.display().to_string(),
            None => "Current Folder".to_string(),
        }
    }

    /// Bitrate requested from the audio extraction step, if any
    pub fn audio_bitrate(&self) -> Option<u32> {
        self.postprocessors.iter().find_map(|pp| match pp {
            PostProcessor::ExtractAudio { bitrate_kbps, .. } => Some(*bitrate_kbps),
        })
    }

    /// Translate into yt-dlp command-line arguments (without the URL)
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-f".to_string(), self.format.clone()];

        if let Some(container) = &self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }

        args.push("-o".to_string());
        args.push(self.output_template.clone());

        if let Some(home) = &self.home_path {
            args.push("--paths".to_string());
            args.push(format!("home:{}", home.display()));
        }

        if self.no_playlist {
            args.push("--no-playlist".to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
        }
        if self.no_warnings {
            args.push("--no-warnings".to_string());
        }

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.display().to_string());
        }

        for pp in &self.postprocessors {
            match pp {
                PostProcessor::ExtractAudio {
                    codec,
                    bitrate_kbps,
                } => {
                    args.push("--extract-audio".to_string());
                    args.push("--audio-format".to_string());
                    args.push(codec.clone());
                    args.push("--audio-quality".to_string());
                    args.push(format!("{}K", bitrate_kbps));
                }
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EngineOptions {
        EngineOptions {
            format: "bestaudio/best".to_string(),
            merge_output_format: None,
            output_template: "%(title)s.%(ext)s".to_string(),
            no_playlist: true,
            quiet: true,
            no_warnings: true,
            home_path: None,
            ffmpeg_location: None,
            postprocessors: vec![],
        }
    }

    #[test]
    fn test_args_without_destination() {
        let args = base().to_args();
        assert_eq!(
            args,
            vec![
                "-f",
                "bestaudio/best",
                "-o",
                "%(title)s.%(ext)s",
                "--no-playlist",
                "--quiet",
                "--no-warnings"
            ]
        );
    }

    #[test]
    fn test_args_with_paths_and_extraction() {
        let mut opts = base();
        opts.home_path = Some(PathBuf::from("/tmp/out"));
        opts.ffmpeg_location = Some(PathBuf::from("/opt/tools"));
        opts.postprocessors.push(PostProcessor::ExtractAudio {
            codec: "mp3".to_string(),
            bitrate_kbps: 320,
        });

        let args = opts.to_args();
        let joined = args.join(" ");
        assert!(joined.contains("--paths home:/tmp/out"));
        assert!(joined.contains("--ffmpeg-location /opt/tools"));
        assert!(joined.contains("--extract-audio --audio-format mp3 --audio-quality 320K"));
        assert_eq!(opts.audio_bitrate(), Some(320));
    }

    #[test]
    fn test_merge_format_flag() {
        let mut opts = base();
        opts.merge_output_format = Some("mkv".to_string());
        let args = opts.to_args();
        let pos = args.iter().position(|a| a == "--merge-output-format").unwrap();
        assert_eq!(args[pos + 1], "mkv");
    }

    #[test]
    fn test_destination_label() {
        let mut opts = base();
        assert_eq!(opts.destination_label(), "Current Folder");
        opts.home_path = Some(PathBuf::from("/srv/media"));
        assert_eq!(opts.destination_label(), "/srv/media");
    }
}
