use serde::{Deserialize, Serialize};

use crate::types::{Message, Model};

/// Parameters for a non-streaming chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model that will complete the conversation.
    pub model: Model,

    /// The ordered conversation sent to the model.
    pub messages: Vec<Message>,

    /// Always false; this client does not consume token streams.
    pub stream: bool,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Create a new request for `model` over `messages`.
    pub fn new(model: Model, messages: Vec<Message>) -> Self {
        Self {
            model,
            messages,
            stream: false,
            max_tokens: None,
        }
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
