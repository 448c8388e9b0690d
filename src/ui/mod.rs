//! CLI UI utilities for colored terminal output.
//!
//! This module provides colored status lines, section headers, and the
//! loading spinner used by the one-shot commands. Fragments carry their
//! status glyph in plain text; [`print_fragment`] recognizes the glyph and
//! colors it at print time, so rendering stays free of terminal concerns.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::render::Fragment;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Pending,
    Loading,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Pending => "○",
        Status::Loading => "◐",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, message: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), message),
        Status::Error => println!("{} {}", icon.red().bold(), message),
        Status::Warning => println!("{} {}", icon.yellow().bold(), message),
        Status::Info => println!("{} {}", icon.cyan().bold(), message),
        Status::Pending => println!("{} {}", icon.white().dimmed(), message),
        Status::Loading => println!("{} {}", icon.cyan(), message),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print a fragment, coloring the status glyph when a line carries one.
pub fn print_fragment(fragment: &Fragment) {
    for line in fragment.lines() {
        match split_glyph(line) {
            Some((status, rest)) => print_status(status, rest),
            None => println!("{}", line),
        }
    }
}

/// Split a leading status glyph off a rendered line.
fn split_glyph(line: &str) -> Option<(Status, &str)> {
    if let Some(rest) = line.strip_prefix("✓ ") {
        Some((Status::Success, rest))
    } else if let Some(rest) = line.strip_prefix("✗ ") {
        Some((Status::Error, rest))
    } else if let Some(rest) = line.strip_prefix("◐ ") {
        Some((Status::Loading, rest))
    } else {
        None
    }
}

/// Print a loading spinner with message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Set the message.
    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("✓ ✗ "),
        );
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.red} {msg}")
                .unwrap()
                .tick_chars("✓ ✗ "),
        );
        self.pb.finish_with_message(msg.to_string());
    }

    /// Clear the spinner without a final message.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Loading), "◐");
        assert_eq!(status_icon(Status::Pending), "○");
    }

    #[test]
    fn test_split_glyph() {
        assert_eq!(
            split_glyph("✓ Successfully ingested 2 paper(s)."),
            Some((Status::Success, "Successfully ingested 2 paper(s)."))
        );
        assert_eq!(
            split_glyph("✗ Error: An API error occurred"),
            Some((Status::Error, "Error: An API error occurred"))
        );
        assert_eq!(
            split_glyph("◐ Searching..."),
            Some((Status::Loading, "Searching..."))
        );
        assert_eq!(split_glyph("1. Plain result line"), None);
        assert_eq!(split_glyph(""), None);
    }
}
