//! Console output for the chat session.
//!
//! This module provides the renderer trait used by the session and the
//! connector, and a plain-text implementation for terminals.

use std::io::{self, IsTerminal, Stdout, Write};

/// ANSI escape code for dim text (used for informational messages).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for green text (used for the reply prefix).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Prefix shown before every reply.
pub const REPLY_PREFIX: &str = "Bot: ";

/// Trait for rendering session output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Print a block of text verbatim, such as the conversation history.
    fn print_text(&mut self, text: &str);

    /// Print the reply to a query.
    fn print_reply(&mut self, reply: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Formats a reply the way it is shown to the user.
pub fn format_reply(reply: &str) -> String {
    format!("{REPLY_PREFIX}{reply}")
}

/// Plain text renderer with optional ANSI styling.
///
/// Replies, text, and info go to stdout; errors go to stderr.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer, coloured only when stdout is a terminal.
    pub fn new() -> Self {
        Self::with_color(io::stdout().is_terminal())
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn write_line(&mut self, line: &str) {
        let mut out = self.stdout.lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        self.write_line(text);
    }

    fn print_reply(&mut self, reply: &str) {
        if self.use_color {
            self.write_line(&format!("{ANSI_GREEN}{REPLY_PREFIX}{ANSI_RESET}{reply}"));
        } else {
            self.write_line(&format_reply(reply));
        }
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}{error}{ANSI_RESET}");
        } else {
            eprintln!("{error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            self.write_line(&format!("{ANSI_DIM}{info}{ANSI_RESET}"));
        } else {
            self.write_line(info);
        }
    }
}
