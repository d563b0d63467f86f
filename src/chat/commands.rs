//! In-band command recognition for the chat application.
//!
//! Three inputs control the session instead of being sent to the service.
//! Matching is case-insensitive and exact: surrounding whitespace makes the
//! input an ordinary query.

/// A parsed chat command.
///
/// These commands control the session and are not sent to the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// End the session.
    Exit,

    /// Display the conversation log.
    History,

    /// Delete the conversation log.
    ClearHistory,
}

/// Classifies user input.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent to the service as a query.
///
/// # Examples
///
/// ```
/// # use groqchat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("EXIT"), Some(ChatCommand::Exit));
/// assert_eq!(parse_command("Clear History"), Some(ChatCommand::ClearHistory));
/// assert!(parse_command("Hello, Groq!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    match input.to_lowercase().as_str() {
        "exit" => Some(ChatCommand::Exit),
        "history" => Some(ChatCommand::History),
        "clear history" => Some(ChatCommand::ClearHistory),
        _ => None,
    }
}

/// Returns the banner printed when the session starts.
pub fn banner() -> &'static str {
    "Starting chatbot. Type 'exit' to end the session or 'history' to view past conversations."
}
