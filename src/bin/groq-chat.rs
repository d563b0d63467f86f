//! Interactive chat application for conversing with a Groq-hosted model.
//!
//! Every query is answered by the completion service and appended, with its
//! reply, to a plain-text conversation log.
//!
//! # Usage
//!
//! ```bash
//! # The API key is only read from the environment
//! export GROQ_API_KEY=...
//!
//! # Basic usage with default settings
//! groq-chat
//!
//! # Specify a model and log location
//! groq-chat --model llama-3.3-70b-versatile --history-file ~/chat.txt
//!
//! # Disable colors (useful for piping output)
//! groq-chat --no-color
//! ```
//!
//! # Commands
//!
//! - `exit` - End the session
//! - `history` - Show the conversation log
//! - `clear history` - Delete the conversation log
//!
//! Input piped on stdin is read line by line without the line editor.
//!
//! Set `RUST_LOG=debug` for diagnostic output on stderr.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use arrrg::CommandLine;
use tracing_subscriber::EnvFilter;

use groqchat::chat::{
    ChatArgs, ChatConfig, ChatSession, EditorLineSource, LineSource, PlainTextRenderer,
    ReaderLineSource,
};
use groqchat::{Connector, Groq, HistoryLog};

/// Main entry point for the groq-chat application.
#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("groq-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ChatConfig) -> groqchat::Result<()> {
    let client = Groq::with_options(None, config.base_url.clone(), Some(config.timeout))?;
    let connector =
        Connector::new(client, config.model.clone()).with_max_tokens(config.max_tokens);
    let history = HistoryLog::new(config.history_file.clone());
    tracing::debug!(model = %config.model, history = history.path().as_str(), "starting session");

    let mut session = ChatSession::new(connector, history);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut input = line_source()?;
    session.run(input.as_mut(), &mut renderer).await
}

/// A line editor on a terminal, plain line reads from a pipe.
fn line_source() -> groqchat::Result<Box<dyn LineSource>> {
    if io::stdin().is_terminal() {
        Ok(Box::new(EditorLineSource::new()?))
    } else {
        Ok(Box::new(ReaderLineSource::new(io::stdin().lock(), io::stdout())))
    }
}
