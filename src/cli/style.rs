//! Terminal styling helpers
//!
//! Colors are applied unconditionally; `anstream` strips them when the
//! output is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark printed before finished steps
pub const CHECK: &str = "✓";

/// Semantic styles for status output
pub trait Stylize: Display {
    /// Something finished well
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Something needs the operator's attention
    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    /// Something failed
    fn failure(&self) -> String {
        self.red().bold().to_string()
    }

    /// Secondary detail
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Branch and remote names
    fn accent(&self) -> String {
        self.cyan().to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner used while talking to the remote
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
