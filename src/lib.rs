// Public modules
pub mod chat;
pub mod client;
pub mod connector;
pub mod error;
pub mod history;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{API_KEY_ENV, Groq};
pub use connector::{CompletionService, Connector, PROBE_MESSAGE};
pub use error::{Error, Result};
pub use history::{ClearOutcome, DEFAULT_HISTORY_FILE, Exchange, HistoryLog, NO_HISTORY};
pub use observability::register_biometrics;
pub use types::*;
