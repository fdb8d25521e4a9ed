//! Terminal capability detection and status colours

use coursetree::Status;
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Shortens `text` to at most `width` characters, marking the cut with an
/// ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color with the colour of a course status
    fn status(&self, status: Status) -> String;
    /// Color as a heading
    fn heading(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn status(&self, status: Status) -> String {
        if !supports_color() {
            return self.to_string();
        }
        match status {
            Status::Done => self.fg::<css::GreenYellow>().to_string(),
            Status::None => self.fg::<css::WhiteSmoke>().to_string(),
            Status::Xout => self.fg::<css::Lavender>().to_string(),
            Status::Outs => self.fg::<css::Wheat>().to_string(),
            Status::Creq => self.fg::<css::Gold>().to_string(),
            Status::Preq => self.fg::<css::Pink>().to_string(),
            Status::Excl => self.fg::<css::LightSteelBlue>().to_string(),
        }
    }

    fn heading(&self) -> String {
        if supports_color() {
            self.bold().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn status(&self, status: Status) -> String {
        self.as_str().status(status)
    }

    fn heading(&self) -> String {
        self.as_str().heading()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Calculus", 8), "Calculus");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Software Construction", 9), "Software…");
        assert_eq!(truncate("abc", 0), "…");
    }
}
