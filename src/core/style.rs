// src/core/style.rs

use crate::system::executor::Invocation;
use colored::{ColoredString, Colorize};

/// Immutable presentation settings shared by handlers and the completion front-end.
///
/// `colored` decides the look of diagnostics; `formatter` is the optional external
/// colorizer listing output is piped through. Both collapse to plain text when off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    colored: bool,
    formatter: Option<Invocation>,
}

impl Style {
    /// `colored` should already account for `NO_COLOR` and the config switch.
    pub fn new(colored: bool, formatter: Option<Invocation>) -> Self {
        Self { colored, formatter }
    }

    /// No colors, no formatter.
    pub fn plain() -> Self {
        Self::default()
    }

    /// The colorizer listings are piped through, if any.
    pub fn formatter(&self) -> Option<&Invocation> {
        self.formatter.as_ref()
    }

    fn paint(&self, text: &str, f: impl FnOnce(ColoredString) -> ColoredString) -> String {
        if self.colored {
            f(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    /// One-line diagnostic for the error stream.
    pub fn error(&self, message: &str) -> String {
        format!("{} {}", self.paint("✗", |s| s.red().bold()), self.paint(message, |s| s.red()))
    }

    /// `✓ message`
    pub fn success(&self, message: &str) -> String {
        format!("{} {}", self.paint("✓", |s| s.green().bold()), message)
    }

    /// `! message`, used for gate summaries.
    pub fn warning(&self, message: &str) -> String {
        format!(
            "{} {}",
            self.paint("!", |s| s.yellow().bold()),
            self.paint(message, |s| s.yellow().bold())
        )
    }

    /// Neutral notice, used for cancellations and no-ops.
    pub fn notice(&self, message: &str) -> String {
        format!("{} {}", self.paint("•", |s| s.cyan()), message)
    }

    /// A container, service or file name.
    pub fn target(&self, name: &str) -> String {
        self.paint(name, |s| s.cyan())
    }

    /// Table and help headers.
    pub fn header(&self, text: &str) -> String {
        self.paint(text, |s| s.bold())
    }

    /// Secondary details.
    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }
}
