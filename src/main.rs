//! Rustgrab - interactive video & audio downloader
//!
//! A small terminal menu in front of yt-dlp and ffmpeg. All prompts are
//! interactive; the only flags are `--help` and `--version`.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();

    // Logs go to stderr and stay quiet unless RUST_LOG asks otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    rustgrab::app::run()
}
