//! Thin wrappers over dialoguer prompts
//!
//! A prompt dismissed with Esc/q or interrupted with Ctrl+C comes back as
//! `Ok(None)`. The callers decide what cancelling means at their level.

use crate::utils::error::RustgrabError;
use dialoguer::theme::Theme;
use dialoguer::{Confirm, Input, Select};

fn cancelled_on_interrupt<T>(result: dialoguer::Result<Option<T>>) -> Result<Option<T>, RustgrabError> {
    match result {
        Ok(value) => Ok(value),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pick one of `items`, returning its index
pub fn select(
    theme: &dyn Theme,
    prompt: &str,
    items: &[&str],
) -> Result<Option<usize>, RustgrabError> {
    cancelled_on_interrupt(
        Select::with_theme(theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt(),
    )
}

/// Free text, empty input allowed
pub fn text(theme: &dyn Theme, prompt: &str) -> Result<Option<String>, RustgrabError> {
    cancelled_on_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(Some),
    )
}

/// Yes/no question, defaulting to no. Cancelling counts as no.
pub fn confirm(theme: &dyn Theme, prompt: &str) -> Result<bool, RustgrabError> {
    let answer = cancelled_on_interrupt(
        Confirm::with_theme(theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt(),
    )?;
    Ok(answer.unwrap_or(false))
}
