//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration used to build the client, the history log, and the
//! renderer.  Every setting has a default, so running with no flags works;
//! flags win over environment variables, which win over defaults.  The API
//! key is only ever read from the environment.

use std::env;
use std::io::{self, IsTerminal};
use std::time::Duration;

use arrrg_derive::CommandLine;
use utf8path::Path;

use crate::history::DEFAULT_HISTORY_FILE;
use crate::types::Model;

/// Environment variable naming the model.
pub const MODEL_ENV: &str = "GROQ_MODEL";

/// Environment variable naming the API endpoint.
pub const BASE_URL_ENV: &str = "GROQ_API_URL";

/// Environment variable naming the history file.
pub const HISTORY_FILE_ENV: &str = "GROQ_CHAT_HISTORY";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the groq-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: llama3-8b-8192)", "MODEL")]
    pub model: Option<String>,

    /// API endpoint.
    #[arrrg(optional, "API endpoint (default: https://api.groq.com/openai/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Conversation log.
    #[arrrg(optional, "History file (default: conversation_history.txt)", "PATH")]
    pub history_file: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: service default)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments and the environment with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// API endpoint; `None` uses the client's default.
    pub base_url: Option<String>,

    /// Where exchanges are logged.
    pub history_file: Path<'static>,

    /// Timeout applied to every request.
    pub timeout: Duration,

    /// Maximum tokens per response; `None` leaves it to the service.
    pub max_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: llama3-8b-8192
    /// - Endpoint: client default
    /// - History file: conversation_history.txt
    /// - Timeout: 60 seconds
    /// - Color: enabled, unless stdout is not a terminal
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            history_file: Path::from(DEFAULT_HISTORY_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: None,
            use_color: true,
        }
    }

    /// Resolves `args` against environment variables looked up with `lookup`.
    pub fn resolve<F>(args: ChatArgs, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = ChatConfig::new();
        ChatConfig {
            model: args
                .model
                .or_else(|| lookup(MODEL_ENV))
                .map(Model::from)
                .unwrap_or(defaults.model),
            base_url: args.base_url.or_else(|| lookup(BASE_URL_ENV)),
            history_file: args
                .history_file
                .or_else(|| lookup(HISTORY_FILE_ENV))
                .map(|path| Path::from(path.as_str()).into_owned())
                .unwrap_or(defaults.history_file),
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_tokens: args.max_tokens,
            use_color: !args.no_color,
        }
    }

    /// Turns colour off when stdout is not a terminal.
    pub fn for_terminal(mut self, stdout_is_terminal: bool) -> Self {
        self.use_color &= stdout_is_terminal;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig::resolve(args, |name| env::var(name).ok())
            .for_terminal(io::stdout().is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Llama3_8b8192));
        assert_eq!(config.history_file.as_str(), "conversation_history.txt");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.base_url.is_none());
        assert!(config.max_tokens.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::resolve(ChatArgs::default(), no_env);
        assert_eq!(config.model, Model::Known(KnownModel::Llama3_8b8192));
        assert_eq!(config.history_file.as_str(), DEFAULT_HISTORY_FILE);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("llama-3.3-70b-versatile".to_string()),
            base_url: Some("http://localhost:8080/v1/".to_string()),
            history_file: Some("/tmp/chat.txt".to_string()),
            timeout_secs: Some(5),
            max_tokens: Some(512),
            no_color: true,
        };
        let config = ChatConfig::resolve(args, no_env);
        assert_eq!(config.model, Model::Known(KnownModel::Llama33_70bVersatile));
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:8080/v1/")
        );
        assert_eq!(config.history_file.as_str(), "/tmp/chat.txt");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_tokens, Some(512));
        assert!(!config.use_color);
    }

    #[test]
    fn environment_fills_gaps() {
        let env = |name: &str| match name {
            MODEL_ENV => Some("custom-model".to_string()),
            BASE_URL_ENV => Some("http://proxy/v1/".to_string()),
            HISTORY_FILE_ENV => Some("env_history.txt".to_string()),
            _ => None,
        };
        let config = ChatConfig::resolve(ChatArgs::default(), env);
        assert_eq!(config.model, Model::Custom("custom-model".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("http://proxy/v1/"));
        assert_eq!(config.history_file.as_str(), "env_history.txt");
    }

    #[test]
    fn flags_beat_environment() {
        let env = |name: &str| match name {
            MODEL_ENV => Some("custom-model".to_string()),
            _ => None,
        };
        let args = ChatArgs {
            model: Some("gemma2-9b-it".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::resolve(args, env);
        assert_eq!(config.model, Model::Known(KnownModel::Gemma2_9bIt));
    }

    #[test]
    fn blank_environment_is_ignored() {
        let env = |_: &str| Some("  ".to_string());
        let config = ChatConfig::resolve(ChatArgs::default(), env);
        assert_eq!(config.model, Model::default());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn piped_output_is_uncoloured() {
        let config = ChatConfig::resolve(ChatArgs::default(), no_env);
        assert!(!config.clone().for_terminal(false).use_color);
        assert!(config.for_terminal(true).use_color);

        let args = ChatArgs {
            no_color: true,
            ..ChatArgs::default()
        };
        assert!(!ChatConfig::resolve(args, no_env).for_terminal(true).use_color);
    }
}
