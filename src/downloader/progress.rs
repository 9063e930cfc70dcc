//! Progress relay: engine progress events to a terminal progress bar

use crate::engine::{Phase, ProgressObserver, ProgressUpdate};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress of the download currently in flight
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    /// 0.0 to 100.0
    pub percent_complete: f64,
    pub phase: Phase,
}

/// Single-task progress bar fed by engine events
pub struct ProgressRelay {
    bar: ProgressBar,
    state: ProgressState,
}

impl ProgressRelay {
    /// Progress bar drawn on stderr
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Relay that tracks state without drawing anything
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), target);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} {bar:40.cyan/blue} {percent:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─"),
        );
        bar.set_message("Downloading...");
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            state: ProgressState::default(),
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Tear the bar down. Called after every download, whatever the outcome.
    pub fn finish(&mut self) {
        self.state.phase = Phase::Done;
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressRelay {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        match update.phase {
            Phase::Downloading => {
                // Unparsable percentage: keep the last good value
                let Some(percent) = update.percent else {
                    return;
                };
                let percent = percent.clamp(0.0, 100.0);
                self.state.percent_complete = percent;
                self.state.phase = Phase::Downloading;
                self.bar.set_position(percent.round() as u64);
                self.bar.set_message(format!(
                    "{}",
                    console::style(format!(
                        "Downloading: {}...",
                        update.filename.as_deref().unwrap_or("File")
                    ))
                    .cyan()
                ));
            }
            Phase::Converting => {
                self.state.percent_complete = 100.0;
                self.state.phase = Phase::Converting;
                self.bar.set_position(100);
                self.bar.set_message(format!(
                    "{}",
                    console::style("Processing conversion...").green()
                ));
            }
            Phase::Done => {
                self.state.percent_complete = 100.0;
                self.state.phase = Phase::Done;
                self.bar.set_position(100);
            }
        }
    }
}

impl Drop for ProgressRelay {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
