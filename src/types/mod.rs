// Public modules
pub mod chat_completion;
pub mod chat_completion_request;
pub mod message;
pub mod model;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, ChoiceMessage, CompletionUsage};
pub use chat_completion_request::ChatCompletionRequest;
pub use message::{Message, MessageRole};
pub use model::{KnownModel, Model};
