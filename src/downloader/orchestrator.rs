//! Runs one download through the engine and reports how it went

use crate::downloader::options::{resolve_destination, DownloadRequest};
use crate::downloader::progress::ProgressRelay;
use crate::engine::{Engine, EngineError, EngineOptions};
use crate::utils::config::AppSettings;
use console::style;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// How a download attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    /// The engine reported a download failure
    Failed(String),
    /// Anything else went wrong
    Unexpected(String),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Completed)
    }
}

impl From<Result<(), EngineError>> for DownloadOutcome {
    fn from(result: Result<(), EngineError>) -> Self {
        match result {
            Ok(()) => DownloadOutcome::Completed,
            Err(EngineError::Download(msg)) => DownloadOutcome::Failed(msg),
            Err(EngineError::Unexpected(msg)) => DownloadOutcome::Unexpected(msg),
        }
    }
}

/// Download orchestrator
///
/// Owns the engine and the output stream. Never fails: every outcome ends up
/// as a printed message.
pub struct Downloader<E, W> {
    engine: E,
    out: W,
    show_progress: bool,
}

impl<E: Engine> Downloader<E, std::io::Stdout> {
    pub fn new(engine: E) -> Self {
        Self::with_output(engine, std::io::stdout())
    }
}

impl<E: Engine, W: Write> Downloader<E, W> {
    pub fn with_output(engine: E, out: W) -> Self {
        Self {
            engine,
            out,
            show_progress: true,
        }
    }

    /// Run without drawing the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Download `request` into the directory configured in `settings`
    pub async fn download_request(
        &mut self,
        request: &DownloadRequest,
        settings: &AppSettings,
        ffmpeg_location: Option<PathBuf>,
    ) -> DownloadOutcome {
        let destination = resolve_destination(settings);
        let options = request
            .options_for(&destination)
            .with_ffmpeg_location(ffmpeg_location);
        let notice = destination.fallback_notice();

        self.run(
            &request.url,
            &options,
            &request.description(),
            notice.as_deref(),
        )
        .await
    }

    pub async fn download(
        &mut self,
        url: &str,
        options: &EngineOptions,
        description: &str,
    ) -> DownloadOutcome {
        self.run(url, options, description, None).await
    }

    async fn run(
        &mut self,
        url: &str,
        options: &EngineOptions,
        description: &str,
        notice: Option<&str>,
    ) -> DownloadOutcome {
        // Terminal write failures are not worth aborting a download over
        let _ = writeln!(
            self.out,
            "\n{}",
            style(format!("➜ Starting download: {}...", description))
                .green()
                .bold()
        );
        let _ = writeln!(
            self.out,
            "{}",
            style(format!("➜ Saving to: {}", options.destination_label())).dim()
        );
        if let Some(notice) = notice {
            let _ = writeln!(self.out, "{}", style(format!("⚠ {}", notice)).yellow());
        }
        let _ = self.out.flush();

        info!("Downloading {} via {}", url, self.engine.id());

        let mut relay = if self.show_progress {
            ProgressRelay::new()
        } else {
            ProgressRelay::hidden()
        };
        let result = self.engine.run(url, options, &mut relay).await;
        relay.finish();

        let outcome = DownloadOutcome::from(result);
        self.report(&outcome);
        outcome
    }

    fn report(&mut self, outcome: &DownloadOutcome) {
        let line = match outcome {
            DownloadOutcome::Completed => format!(
                "\n{}\n",
                style("✔ Download completed successfully!").green().bold()
            ),
            DownloadOutcome::Failed(msg) => {
                error!("Download error: {}", msg);
                format!("\n{} {}", style("✘ Download Error:").red().bold(), msg)
            }
            DownloadOutcome::Unexpected(msg) => {
                error!("Unexpected error: {}", msg);
                format!("\n{} {}", style("✘ Unexpected Error:").red().bold(), msg)
            }
        };
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }
}
