//! yt-dlp wrapper
//!
//! Runs yt-dlp as a child process and turns its progress template output into
//! [`ProgressUpdate`]s. yt-dlp is asked to print one machine-readable line per
//! progress tick, prefixed with [`PROGRESS_MARKER`].

use crate::engine::models::EngineOptions;
use crate::engine::traits::{Engine, EngineError, ProgressObserver, ProgressUpdate};
use crate::utils::bundle_paths::find_ytdlp;
use crate::utils::error::RustgrabError;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

/// Prefix of the progress lines we ask yt-dlp to print
pub const PROGRESS_MARKER: &str = "rustgrab|";

const DOWNLOAD_TEMPLATE: &str = "download:rustgrab|%(progress.status)s|%(progress._percent_str)s|%(progress.downloaded_bytes)s|%(progress.total_bytes,progress.total_bytes_estimate)s|%(progress.filename)s";
const POSTPROCESS_TEMPLATE: &str =
    "postprocess:rustgrab|postprocess|%(progress.postprocessor)s|%(progress.status)s";

/// Download engine backed by the yt-dlp binary
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    ytdlp_path: Option<PathBuf>,
}

impl YtDlpEngine {
    /// Locate yt-dlp (bundled, PATH, then common install paths)
    pub fn new() -> Result<Self, RustgrabError> {
        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self::with_binary(path))
            }
            None => Err(RustgrabError::YtDlpNotFound),
        }
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: Some(path.into()),
        }
    }

    /// Engine with no binary; every run fails as unexpected
    pub fn missing() -> Self {
        Self { ytdlp_path: None }
    }

    pub fn ytdlp_path(&self) -> Option<&Path> {
        self.ytdlp_path.as_deref()
    }

    /// Full argument list for one run
    pub fn build_args(url: &str, options: &EngineOptions) -> Vec<String> {
        let mut args = options.to_args();
        args.extend(
            [
                "--progress",
                "--newline",
                "--progress-template",
                DOWNLOAD_TEMPLATE,
                "--progress-template",
                POSTPROCESS_TEMPLATE,
                "--",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Engine for YtDlpEngine {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn run(
        &self,
        url: &str,
        options: &EngineOptions,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(), EngineError> {
        let ytdlp = self
            .ytdlp_path
            .as_ref()
            .ok_or_else(|| EngineError::Unexpected(RustgrabError::YtDlpNotFound.to_string()))?;

        let args = Self::build_args(url, options);
        debug!("Running {} {:?}", ytdlp.display(), args);

        let mut child = Command::new(ytdlp)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Unexpected(format!("Failed to start yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Unexpected("yt-dlp stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Unexpected("yt-dlp stderr unavailable".to_string()))?;

        let mut out_reader = BufReader::new(stdout);
        let mut err_reader = BufReader::new(stderr);
        let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
        let mut diagnostics = Vec::new();
        let (mut out_open, mut err_open) = (true, true);

        // Progress may land on either stream depending on --quiet
        while out_open || err_open {
            tokio::select! {
                line = read_line_lossy(&mut out_reader, &mut out_buf), if out_open => match line? {
                    Some(line) => handle_line(&line, observer, &mut diagnostics),
                    None => out_open = false,
                },
                line = read_line_lossy(&mut err_reader, &mut err_buf), if err_open => match line? {
                    Some(line) => handle_line(&line, observer, &mut diagnostics),
                    None => err_open = false,
                },
            }
        }

        let status = child.wait().await?;
        if status.success() {
            return Ok(());
        }

        let message = failure_message(&diagnostics, status.code());
        error!("yt-dlp failed: {}", message);
        Err(EngineError::Download(message))
    }
}

/// Next line of output, decoded lossily
///
/// yt-dlp prints titles in the locale encoding, which is not always UTF-8.
/// Partial reads stay in `buf`, so a cancelled call can simply be retried.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(&['\r', '\n'][..])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

fn handle_line(line: &str, observer: &mut dyn ProgressObserver, diagnostics: &mut Vec<String>) {
    if line.trim_start().starts_with(PROGRESS_MARKER) {
        if let Some(update) = parse_progress_line(line) {
            observer.on_progress(&update);
        }
    } else if !line.trim().is_empty() {
        debug!("yt-dlp: {}", line);
        diagnostics.push(line.trim().to_string());
    }
}

/// Parse one progress template line. Unknown or malformed lines yield `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let mut fields = rest.splitn(5, '|');

    match fields.next()? {
        "downloading" => {
            let percent_str = fields.next().unwrap_or_default();
            let downloaded = fields.next().unwrap_or_default();
            let total = fields.next().unwrap_or_default();
            let filename = fields.next().and_then(display_name);

            let percent =
                parse_percent(percent_str).or_else(|| percent_from_bytes(downloaded, total));
            Some(ProgressUpdate::downloading(percent, filename))
        }
        "finished" | "postprocess" => Some(ProgressUpdate::converting()),
        _ => None,
    }
}

/// Parse yt-dlp's `_percent_str` (e.g. `" 42.7%"`, possibly colored)
pub fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned = console::strip_ansi_codes(raw);
    let value: f64 = cleaned.trim().trim_end_matches('%').trim().parse().ok()?;
    if value.is_finite() {
        Some(value.clamp(0.0, 100.0))
    } else {
        None
    }
}

fn percent_from_bytes(downloaded: &str, total: &str) -> Option<f64> {
    let downloaded: f64 = downloaded.trim().parse().ok()?;
    let total: f64 = total.trim().parse().ok()?;
    if total <= 0.0 {
        return None;
    }
    Some((downloaded / total * 100.0).clamp(0.0, 100.0))
}

fn display_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "NA" {
        return None;
    }
    let name = Path::new(raw)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.to_string());
    Some(name)
}

/// Best human-readable reason for a failed run
fn failure_message(diagnostics: &[String], code: Option<i32>) -> String {
    let errors: Vec<&str> = diagnostics
        .iter()
        .filter(|l| l.starts_with("ERROR:"))
        .map(String::as_str)
        .collect();

    if !errors.is_empty() {
        return errors.join("\n");
    }

    match (diagnostics.last(), code) {
        (Some(last), _) => last.clone(),
        (None, Some(code)) => format!("yt-dlp exited with status {}", code),
        (None, None) => "yt-dlp was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::traits::Phase;

    #[test]
    fn test_parse_downloading_line() {
        let update = parse_progress_line(
            "rustgrab|downloading| 42.5%|425|1000|/tmp/out/My Video.f137.mp4",
        )
        .unwrap();
        assert_eq!(update.phase, Phase::Downloading);
        assert_eq!(update.percent, Some(42.5));
        assert_eq!(update.filename.as_deref(), Some("My Video.f137.mp4"));
    }

    #[test]
    fn test_parse_colored_percent() {
        assert_eq!(parse_percent("\u{1b}[0;94m 73.1%\u{1b}[0m"), Some(73.1));
    }

    #[test]
    fn test_malformed_percent_falls_back_to_bytes() {
        let update = parse_progress_line("rustgrab|downloading|NA|250|1000|clip.webm").unwrap();
        assert_eq!(update.percent, Some(25.0));
    }

    #[test]
    fn test_malformed_everything_yields_no_percent() {
        let update = parse_progress_line("rustgrab|downloading|??|NA|NA|NA").unwrap();
        assert_eq!(update.phase, Phase::Downloading);
        assert_eq!(update.percent, None);
        assert_eq!(update.filename, None);
    }

    #[test]
    fn test_title_with_separator_survives() {
        let update = parse_progress_line("rustgrab|downloading|10%|1|10|a|b.mp4").unwrap();
        assert_eq!(update.filename.as_deref(), Some("a|b.mp4"));
    }

    #[test]
    fn test_finished_and_postprocess_switch_to_converting() {
        for line in [
            "rustgrab|finished|100%|1000|1000|x.mp4",
            "rustgrab|postprocess|FFmpegExtractAudio|started",
        ] {
            let update = parse_progress_line(line).unwrap();
            assert_eq!(update.phase, Phase::Converting);
            assert_eq!(update.percent, Some(100.0));
        }
    }

    #[test]
    fn test_foreign_lines_are_ignored() {
        assert!(parse_progress_line("[youtube] abc: Downloading webpage").is_none());
        assert!(parse_progress_line("rustgrab|error|0%|0|0|x").is_none());
    }

    #[test]
    fn test_failure_message_prefers_error_lines() {
        let diagnostics = vec![
            "WARNING: something".to_string(),
            "ERROR: Unsupported URL: https://example.com".to_string(),
        ];
        assert_eq!(
            failure_message(&diagnostics, Some(1)),
            "ERROR: Unsupported URL: https://example.com"
        );
        assert_eq!(failure_message(&[], Some(2)), "yt-dlp exited with status 2");
    }

    #[test]
    fn test_build_args_ends_with_url() {
        let options = EngineOptions {
            format: "best".to_string(),
            merge_output_format: None,
            output_template: "%(title)s.%(ext)s".to_string(),
            no_playlist: true,
            quiet: true,
            no_warnings: true,
            home_path: None,
            ffmpeg_location: None,
            postprocessors: vec![],
        };
        let args = YtDlpEngine::build_args("https://example.com/watch?v=abc", &options);
        assert_eq!(args.last().unwrap(), "https://example.com/watch?v=abc");
        assert_eq!(args[args.len() - 2], "--");
        assert!(args.contains(&"--progress".to_string()));
    }

    #[tokio::test]
    async fn test_read_line_lossy_replaces_invalid_bytes() {
        let mut reader = BufReader::new(&b"Caf\xe9.mp4\r\nnext\nlast"[..]);
        let mut buf = Vec::new();

        let first = read_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(first.as_deref(), Some("Caf\u{FFFD}.mp4"));
        let second = read_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(second.as_deref(), Some("next"));
        let third = read_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(third.as_deref(), Some("last"));
        assert_eq!(read_line_lossy(&mut reader, &mut buf).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_binary_is_unexpected() {
        struct Ignore;
        impl ProgressObserver for Ignore {
            fn on_progress(&mut self, _update: &ProgressUpdate) {}
        }

        let options = EngineOptions {
            format: "best".to_string(),
            merge_output_format: None,
            output_template: "%(title)s.%(ext)s".to_string(),
            no_playlist: true,
            quiet: true,
            no_warnings: true,
            home_path: None,
            ffmpeg_location: None,
            postprocessors: vec![],
        };
        let result = YtDlpEngine::missing()
            .run("https://example.com", &options, &mut Ignore)
            .await;
        assert!(matches!(result, Err(EngineError::Unexpected(_))));
    }
}
