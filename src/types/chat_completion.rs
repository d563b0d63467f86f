use serde::{Deserialize, Serialize};

use crate::types::MessageRole;

/// A chat completion returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Unique identifier for the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that produced the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generated alternatives, in rank order.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token accounting for the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

/// One generated alternative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ChoiceMessage,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The message inside a [`Choice`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Role of the author, normally assistant.
    pub role: MessageRole,

    /// Generated text; absent when the model produced none.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage for a completion.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionUsage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens generated.
    #[serde(default)]
    pub completion_tokens: u64,

    /// Sum of the two.
    #[serde(default)]
    pub total_tokens: u64,
}

impl ChatCompletion {
    /// Text of the first choice, if it has content.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

impl Choice {
    /// Create an assistant choice carrying `text`.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            index: 0,
            message: ChoiceMessage {
                role: MessageRole::Assistant,
                content: Some(text.into()),
            },
            finish_reason: Some("stop".to_string()),
        }
    }
}
