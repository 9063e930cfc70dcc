//! Main menu loop

use crate::downloader::{AudioQuality, DownloadRequest, Downloader, MediaKind, VideoQuality};
use crate::engine::Engine;
use crate::menu::{prompt, settings_view, theme};
use crate::utils::bundle_paths::find_bundled_ffmpeg_dir;
use crate::utils::config::SettingsStore;
use crate::utils::error::RustgrabError;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use std::io::{Stdout, Write};
use tokio::runtime::Handle;
use tracing::debug;

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    VideoWithAudio,
    VideoNoAudio,
    Audio,
    Settings,
    Exit,
}

impl MainAction {
    pub const ALL: [MainAction; 5] = [
        MainAction::VideoWithAudio,
        MainAction::VideoNoAudio,
        MainAction::Audio,
        MainAction::Settings,
        MainAction::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MainAction::VideoWithAudio => "Video (With Audio)",
            MainAction::VideoNoAudio => "Video (No Audio)",
            MainAction::Audio => "Audio (Music/Podcast)",
            MainAction::Settings => "Settings",
            MainAction::Exit => "Exit",
        }
    }
}

/// Everything the main loop asks of the user
///
/// `None` from a prompt means the user cancelled it.
pub trait MenuUi {
    fn main_action(&mut self) -> Result<Option<MainAction>, RustgrabError>;
    fn url(&mut self) -> Result<Option<String>, RustgrabError>;
    fn media_kind(&mut self, action: MainAction) -> Result<Option<MediaKind>, RustgrabError>;
    fn settings(&mut self, store: &SettingsStore) -> Result<(), RustgrabError>;
    /// Wait for Enter after a download
    fn pause(&mut self) -> Result<(), RustgrabError>;
}

/// dialoguer prompts on the real terminal
pub struct TerminalUi {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: theme::prompt_theme(),
        }
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuUi for TerminalUi {
    fn main_action(&mut self) -> Result<Option<MainAction>, RustgrabError> {
        theme::show_banner(&self.term)?;
        let items: Vec<&str> = MainAction::ALL.iter().map(|a| a.as_str()).collect();
        let index = prompt::select(&self.theme, "What do you want to do?", &items)?;
        Ok(index.map(|i| MainAction::ALL[i]))
    }

    fn url(&mut self) -> Result<Option<String>, RustgrabError> {
        prompt::text(
            &self.theme,
            "Paste the URL (Youtube, Instagram, TikTok, Twitter...):",
        )
    }

    fn media_kind(&mut self, action: MainAction) -> Result<Option<MediaKind>, RustgrabError> {
        match action {
            MainAction::Audio => {
                let items = AudioQuality::ALL.map(|q| q.as_str());
                let index = prompt::select(&self.theme, "Select audio quality:", &items)?;
                Ok(index.map(|i| MediaKind::Audio {
                    quality: AudioQuality::ALL[i],
                }))
            }
            _ => {
                let items = VideoQuality::ALL.map(|q| q.as_str());
                let index = prompt::select(&self.theme, "Select video quality:", &items)?;
                Ok(index.map(|i| MediaKind::Video {
                    quality: VideoQuality::ALL[i],
                    mute_audio: action == MainAction::VideoNoAudio,
                }))
            }
        }
    }

    fn settings(&mut self, store: &SettingsStore) -> Result<(), RustgrabError> {
        settings_view::run(&self.term, store, &self.theme)
    }

    fn pause(&mut self) -> Result<(), RustgrabError> {
        self.term.write_line(&format!(
            "\n{}",
            style("Press Enter to continue or Ctrl+C to exit...").dim()
        ))?;
        self.term.read_line()?;
        Ok(())
    }
}

/// Interactive front end
///
/// The menu itself is synchronous; downloads are driven to completion on the
/// given runtime handle.
pub struct MenuApp<E: Engine, W: Write = Stdout, U: MenuUi = TerminalUi> {
    store: SettingsStore,
    downloader: Downloader<E, W>,
    runtime: Handle,
    ui: U,
}

impl<E: Engine> MenuApp<E, Stdout, TerminalUi> {
    pub fn new(store: SettingsStore, downloader: Downloader<E, Stdout>, runtime: Handle) -> Self {
        Self::with_ui(store, downloader, runtime, TerminalUi::new())
    }
}

impl<E: Engine, W: Write, U: MenuUi> MenuApp<E, W, U> {
    pub fn with_ui(
        store: SettingsStore,
        downloader: Downloader<E, W>,
        runtime: Handle,
        ui: U,
    ) -> Self {
        Self {
            store,
            downloader,
            runtime,
            ui,
        }
    }

    /// Run until the user picks Exit (`Ok`) or cancels (`Err(Cancelled)`)
    pub fn run(&mut self) -> Result<(), RustgrabError> {
        loop {
            let action = self.ui.main_action()?.ok_or(RustgrabError::Cancelled)?;
            debug!("Main menu: {:?}", action);

            match action {
                MainAction::Exit => return Ok(()),
                MainAction::Settings => {
                    self.ui.settings(&self.store)?;
                    continue;
                }
                _ => {}
            }

            let url = self.ui.url()?.ok_or(RustgrabError::Cancelled)?;
            if url.trim().is_empty() {
                continue;
            }

            let kind = self.ui.media_kind(action)?.ok_or(RustgrabError::Cancelled)?;
            self.download(DownloadRequest::new(url, kind));
            self.ui.pause()?;
        }
    }

    fn download(&mut self, request: DownloadRequest) {
        // Settings may have changed since the last download
        let settings = self.store.load();
        self.runtime.block_on(self.downloader.download_request(
            &request,
            &settings,
            find_bundled_ffmpeg_dir(),
        ));
    }
}
