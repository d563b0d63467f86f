//! Line-oriented console input.

use std::io::{BufRead, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// Prompt shown before each line of input.
pub const PROMPT: &str = "You: ";

/// A source of user input lines.
pub trait LineSource {
    /// Reads one line after showing `prompt`.
    ///
    /// Returns `Ok(None)` at end of input.  The returned line has no
    /// trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive input backed by a line editor.
pub struct EditorLineSource {
    editor: DefaultEditor,
}

impl EditorLineSource {
    /// Creates a line editor on the controlling terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(readline_error(err)),
        }
    }
}

/// Input read from any buffered reader, such as a pipe or a test script.
///
/// The prompt is written to `prompt_out` before each read.
pub struct ReaderLineSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> ReaderLineSource<R, W> {
    /// Reads lines from `reader`, echoing prompts to `prompt_out`.
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderLineSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Interrupted => Error::abort("interrupted at prompt"),
        ReadlineError::Io(err) => Error::io("failed to read input", err),
        err => Error::input(err.to_string()),
    }
}
