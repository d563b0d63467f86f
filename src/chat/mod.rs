//! Chat application module for interactive conversations with a Groq model.
//!
//! This module provides the REPL built on top of the groqchat client
//! library. It supports:
//!
//! - Single-turn queries answered by the completion service
//! - A plain-text log of every exchange
//! - The in-band commands `exit`, `history`, and `clear history`
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The session state machine
//! - [`commands`]: Command recognition
//! - [`input`]: Line-oriented console input

mod commands;
mod config;
mod input;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer, format_reply};
pub use commands::{ChatCommand, banner, parse_command};
pub use config::{BASE_URL_ENV, ChatArgs, ChatConfig, HISTORY_FILE_ENV, MODEL_ENV};
pub use input::{EditorLineSource, LineSource, PROMPT, ReaderLineSource};
pub use session::{
    ChatSession, ERROR_REPLY, FAREWELL, NO_RESPONSE_REPLY, SessionState, reply_for,
};
