//! Settings sub-menu

use crate::menu::prompt;
use crate::menu::theme::panel;
use crate::utils::config::SettingsStore;
use crate::utils::error::RustgrabError;
use console::{style, Color, Term};
use dialoguer::theme::Theme;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_PATH_LABEL: &str = "[Default: Current Folder]";

/// Settings menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    ChangePath,
    Reset,
    Back,
}

impl SettingsAction {
    pub const ALL: [SettingsAction; 3] = [
        SettingsAction::ChangePath,
        SettingsAction::Reset,
        SettingsAction::Back,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsAction::ChangePath => "Change Download Path",
            SettingsAction::Reset => "Reset to Default",
            SettingsAction::Back => "Back to Main Menu",
        }
    }
}

/// Result of trying to set a new download path
#[derive(Debug, PartialEq, Eq)]
pub enum PathChange {
    Updated(PathBuf),
    /// The user did not want the missing directory created
    Declined,
    /// The path could not be used or created
    Failed(String),
    /// Directory is fine, but the settings file could not be written
    NotSaved(PathBuf),
}

/// Set the download path to `raw`, asking `confirm_create` before creating it
pub fn apply_path_change<F>(store: &SettingsStore, raw: &str, confirm_create: F) -> PathChange
where
    F: FnOnce(&Path) -> bool,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PathChange::Declined;
    }
    let path = PathBuf::from(trimmed);

    if path.exists() && !path.is_dir() {
        return PathChange::Failed(format!("{} is not a directory", path.display()));
    }

    if !path.exists() {
        if !confirm_create(&path) {
            return PathChange::Declined;
        }
        if let Err(e) = std::fs::create_dir_all(&path) {
            return PathChange::Failed(e.to_string());
        }
    }

    let mut settings = store.load();
    settings.download_path = trimmed.to_string();
    if store.save(&settings) {
        PathChange::Updated(path)
    } else {
        PathChange::NotSaved(path)
    }
}

/// Clear the stored download path
pub fn reset_path(store: &SettingsStore) -> bool {
    let mut settings = store.load();
    settings.download_path.clear();
    store.save(&settings)
}

/// Show the settings menu until the user goes back
pub fn run(term: &Term, store: &SettingsStore, theme: &dyn Theme) -> Result<(), RustgrabError> {
    loop {
        term.clear_screen()?;
        let settings = store.load();
        let current = settings
            .custom_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DEFAULT_PATH_LABEL.to_string());

        term.write_line(&panel(
            Some("Settings"),
            &[
                style("Current Download Path:").bold().to_string(),
                style(current).yellow().to_string(),
            ],
            Color::Yellow,
        ))?;

        let labels: Vec<&str> = SettingsAction::ALL.iter().map(|a| a.as_str()).collect();
        let Some(index) = prompt::select(theme, "Settings Menu:", &labels)? else {
            return Ok(());
        };

        match SettingsAction::ALL[index] {
            SettingsAction::Back => return Ok(()),
            SettingsAction::Reset => {
                if reset_path(store) {
                    term.write_line(&style("Path reset to default.").green().to_string())?;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
            SettingsAction::ChangePath => {
                let Some(raw) = prompt::text(
                    theme,
                    "Enter absolute path (e.g., C:/Downloads or /home/user/):",
                )?
                else {
                    continue;
                };

                // Prompt errors can't leave the closure directly
                let mut prompt_error = None;
                let change = apply_path_change(store, &raw, |path| {
                    let question = format!("Path '{}' does not exist. Create it?", path.display());
                    match prompt::confirm(theme, &question) {
                        Ok(answer) => answer,
                        Err(e) => {
                            prompt_error = Some(e);
                            false
                        }
                    }
                });
                if let Some(e) = prompt_error {
                    return Err(e);
                }

                match change {
                    PathChange::Updated(_) => {
                        term.write_line(&style("Path updated successfully!").green().to_string())?;
                        std::thread::sleep(Duration::from_secs(1));
                    }
                    PathChange::Declined => {
                        term.write_line(&style("Change cancelled.").yellow().to_string())?;
                        std::thread::sleep(Duration::from_secs(1));
                    }
                    PathChange::Failed(reason) => {
                        term.write_line(
                            &style(format!("Error creating directory: {}", reason))
                                .red()
                                .to_string(),
                        )?;
                        term.write_line("Press Enter...")?;
                        term.read_line()?;
                    }
                    PathChange::NotSaved(_) => {
                        // save() already printed the reason
                        term.write_line("Press Enter...")?;
                        term.read_line()?;
                    }
                }
            }
        }
    }
}
