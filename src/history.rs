//! Append-only plain-text conversation log.
//!
//! Every exchange is written as two timestamped lines followed by a blank
//! line:
//!
//! ```text
//! 2024-05-01 12:00:00 - User: hello
//! 2024-05-01 12:00:00 - Bot: hi there
//!
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use utf8path::Path;

use crate::error::{Error, Result};
use crate::observability::{HISTORY_APPENDS, HISTORY_ERRORS};

/// Default location of the log, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "conversation_history.txt";

/// Returned by [`HistoryLog::read_all`] when the log does not exist.
pub const NO_HISTORY: &str = "No conversation history found.";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One user input paired with the reply it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    timestamp: OffsetDateTime,
    user_text: String,
    bot_text: String,
}

impl Exchange {
    /// Creates an exchange stamped with `timestamp`.
    pub fn new(
        timestamp: OffsetDateTime,
        user_text: impl Into<String>,
        bot_text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            user_text: user_text.into(),
            bot_text: bot_text.into(),
        }
    }

    /// When the exchange happened.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// What the user typed.
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    /// What the bot replied.
    pub fn bot_text(&self) -> &str {
        &self.bot_text
    }

    /// The log entry for this exchange, including the trailing blank line.
    pub fn to_log_entry(&self) -> Result<String> {
        let stamp = self.timestamp.format(TIMESTAMP_FORMAT)?;
        Ok(format!(
            "{stamp} - User: {}\n{stamp} - Bot: {}\n\n",
            self.user_text, self.bot_text
        ))
    }
}

/// What [`HistoryLog::clear`] found.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The log existed and was deleted.
    Cleared,
    /// There was no log to delete.
    NothingToClear,
}

/// A conversation log stored as a UTF-8 text file.
///
/// The file is opened for each operation and closed before it returns.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: Path<'static>,
    last_timestamp: Option<OffsetDateTime>,
}

impl HistoryLog {
    /// Creates a log at `path`.  Nothing is touched until the first append.
    pub fn new(path: impl Into<Path<'static>>) -> Self {
        Self {
            path: path.into(),
            last_timestamp: None,
        }
    }

    /// The file backing this log.
    pub fn path(&self) -> &Path<'static> {
        &self.path
    }

    /// Appends an exchange stamped with the current local time.
    pub fn append(&mut self, user_text: &str, bot_text: &str) -> Result<Exchange> {
        self.append_at(now(), user_text, bot_text)
    }

    /// Appends an exchange stamped with `timestamp`.
    ///
    /// Timestamps never go backwards: a timestamp earlier than the last
    /// appended exchange is replaced by that exchange's timestamp.
    pub fn append_at(
        &mut self,
        timestamp: OffsetDateTime,
        user_text: &str,
        bot_text: &str,
    ) -> Result<Exchange> {
        let timestamp = match self.last_timestamp {
            Some(last) if last > timestamp => last,
            _ => timestamp,
        };
        let exchange = Exchange::new(timestamp, user_text, bot_text);
        let entry = exchange.to_log_entry()?;
        self.write_entry(&entry).inspect_err(|err| {
            HISTORY_ERRORS.click();
            let path = self.path.as_str();
            tracing::warn!(path, error = %err, "history append failed");
        })?;
        HISTORY_APPENDS.click();
        tracing::debug!(path = self.path.as_str(), "appended exchange");
        self.last_timestamp = Some(timestamp);
        Ok(exchange)
    }

    /// Returns the whole log, or [`NO_HISTORY`] if it does not exist.
    pub fn read_all(&self) -> Result<String> {
        match fs::read_to_string(self.path.as_str()) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(NO_HISTORY.to_string()),
            Err(err) => {
                HISTORY_ERRORS.click();
                Err(Error::io(
                    format!("failed to read history file {}", self.path.as_str()),
                    err,
                ))
            }
        }
    }

    /// Deletes the log.
    pub fn clear(&self) -> Result<ClearOutcome> {
        match fs::remove_file(self.path.as_str()) {
            Ok(()) => Ok(ClearOutcome::Cleared),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ClearOutcome::NothingToClear),
            Err(err) => {
                HISTORY_ERRORS.click();
                Err(Error::io(
                    format!("failed to delete history file {}", self.path.as_str()),
                    err,
                ))
            }
        }
    }

    fn write_entry(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_str())
            .map_err(|err| Error::io(format!("failed to open {}", self.path.as_str()), err))?;
        file.write_all(entry.as_bytes())
            .map_err(|err| Error::io(format!("failed to write {}", self.path.as_str()), err))
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}

/// The current local time, or UTC when the local offset is unknown.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
