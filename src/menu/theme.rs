//! Terminal look: banner, boxed panels and the prompt theme

use console::{measure_text_width, style, Color, Term};
use dialoguer::theme::ColorfulTheme;
use std::io;

pub const APP_TITLE: &str = "R U S T G R A B";
pub const TAGLINE: &str = "Video & audio downloads, powered by yt-dlp";

/// Prompt theme used by every menu
pub fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_style: console::Style::new().white().bold(),
        active_item_style: console::Style::new().cyan().bold(),
        values_style: console::Style::new().cyan().bold(),
        ..ColorfulTheme::default()
    }
}

/// Render `lines` inside a rounded box, optionally with a title in the top border
pub fn panel(title: Option<&str>, lines: &[String], border: Color) -> String {
    let inner = lines
        .iter()
        .map(|l| measure_text_width(l))
        .chain(title.map(|t| measure_text_width(t) + 2))
        .max()
        .unwrap_or(0)
        + 2;

    let paint = |s: String| style(s).fg(border).to_string();

    let top = match title {
        Some(t) => {
            let label = format!(" {} ", t);
            let rest = inner.saturating_sub(measure_text_width(&label));
            let left = rest / 2;
            format!(
                "{}{}{}",
                paint(format!("╭{}", "─".repeat(left))),
                style(label).fg(border).bold(),
                paint(format!("{}╮", "─".repeat(rest - left)))
            )
        }
        None => paint(format!("╭{}╮", "─".repeat(inner))),
    };

    let mut out = vec![top];
    for line in lines {
        let pad = inner - 2 - measure_text_width(line);
        out.push(format!(
            "{} {}{} {}",
            paint("│".to_string()),
            line,
            " ".repeat(pad),
            paint("│".to_string())
        ));
    }
    out.push(paint(format!("╰{}╯", "─".repeat(inner))));
    out.join("\n")
}

/// Clear the screen and draw the title banner
pub fn show_banner(term: &Term) -> io::Result<()> {
    term.clear_screen()?;
    let lines = vec![
        String::new(),
        style(APP_TITLE).cyan().bold().to_string(),
        String::new(),
        style(TAGLINE).white().bold().to_string(),
        String::new(),
    ];
    term.write_line(&panel(None, &centered(&lines), Color::Cyan))?;
    Ok(())
}

fn centered(lines: &[String]) -> Vec<String> {
    let width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0) + 8;
    lines
        .iter()
        .map(|l| {
            let w = measure_text_width(l);
            let left = (width - w) / 2;
            format!("{}{}{}", " ".repeat(left), l, " ".repeat(width - w - left))
        })
        .collect()
}

pub fn goodbye(term: &Term) -> io::Result<()> {
    term.clear_screen()?;
    let line = style("Thanks for using Rustgrab! Goodbye.").cyan().bold().to_string();
    term.write_line(&panel(None, &[line], Color::Cyan))
}

pub fn cancelled_notice() -> String {
    format!(
        "\n\n{}",
        style("! Operation cancelled by user.").red().bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_lines_have_equal_width() {
        let rendered = panel(
            Some("Settings"),
            &["short".to_string(), "a much longer line".to_string()],
            Color::Yellow,
        );
        let widths: Vec<usize> = rendered.lines().map(measure_text_width).collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert!(console::strip_ansi_codes(&rendered).contains(" Settings "));
    }

    #[test]
    fn test_panel_with_long_title() {
        let rendered = panel(Some("A rather long title"), &["x".to_string()], Color::Cyan);
        let widths: Vec<usize> = rendered.lines().map(measure_text_width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_centered_keeps_width() {
        let lines = centered(&["ab".to_string(), "abcdef".to_string()]);
        assert_eq!(measure_text_width(&lines[0]), measure_text_width(&lines[1]));
    }
}
