//! Interactive terminal menus

pub mod app;
pub mod prompt;
pub mod settings_view;
pub mod theme;

pub use app::{MainAction, MenuApp, MenuUi, TerminalUi};
pub use settings_view::{apply_path_change, PathChange, SettingsAction};
