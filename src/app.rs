//! Application wiring and process exit handling

use crate::downloader::Downloader;
use crate::engine::YtDlpEngine;
use crate::menu::{theme, MenuApp};
use crate::utils::config::SettingsStore;
use anyhow::Result;
use console::Term;
use std::time::Duration;
use tracing::warn;

/// Run Rustgrab until the user exits
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.spawn(watch_interrupt());

    let engine = match YtDlpEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            // Keep going; downloads will report the missing binary
            warn!("{}", e);
            YtDlpEngine::missing()
        }
    };

    let mut menu = MenuApp::new(
        SettingsStore::default(),
        Downloader::new(engine),
        runtime.handle().clone(),
    );

    match menu.run() {
        Ok(()) => {
            theme::goodbye(&Term::stdout())?;
            std::thread::sleep(Duration::from_secs(2));
            std::process::exit(0);
        }
        Err(e) if e.is_cancelled() => exit_cancelled(),
        Err(e) => Err(e.into()),
    }
}

/// Ctrl+C outside a prompt (while downloading or waiting for Enter)
async fn watch_interrupt() {
    if tokio::signal::ctrl_c().await.is_ok() {
        exit_cancelled();
    }
}

fn exit_cancelled() -> ! {
    let _ = Term::stderr().show_cursor();
    println!("{}", theme::cancelled_notice());
    std::process::exit(0);
}
