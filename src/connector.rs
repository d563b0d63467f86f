//! The completion contract used by the chat session.
//!
//! [`Connector`] turns a [`CompletionService`] into the two operations the
//! session needs: a liveness probe that only reports, and a single-turn
//! completion that returns either the reply text or a typed failure.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::observability::{CONNECTOR_EMPTY_RESPONSES, CONNECTOR_PROBE_FAILURES};
use crate::render::Renderer;
use crate::types::{ChatCompletion, ChatCompletionRequest, Message, Model};

/// System message sent by [`Connector::probe_connection`].
pub const PROBE_MESSAGE: &str = "Connecting to Groq service...";

/// A remote service that maps a conversation to a chat completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Exchange `request` for a completion.
    async fn create(&self, request: ChatCompletionRequest) -> Result<ChatCompletion>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for std::sync::Arc<T> {
    async fn create(&self, request: ChatCompletionRequest) -> Result<ChatCompletion> {
        (**self).create(request).await
    }
}

/// Single-turn access to a completion service.
pub struct Connector<S: CompletionService> {
    service: S,
    model: Model,
    max_tokens: Option<u32>,
}

impl<S: CompletionService> Connector<S> {
    /// Creates a connector that asks `model` for completions.
    pub fn new(service: S, model: Model) -> Self {
        Self {
            service,
            model,
            max_tokens: None,
        }
    }

    /// Caps generated tokens on every request.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns the model used for requests.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Sends a minimal system message to check that the service answers.
    ///
    /// The outcome is reported through `renderer` and returned; a failed
    /// probe is never an error for the caller.
    pub async fn probe_connection(&self, renderer: &mut dyn Renderer) -> bool {
        match self.send(vec![Message::system(PROBE_MESSAGE)]).await {
            Ok(_) => {
                renderer.print_info("Connected to Groq service successfully.");
                true
            }
            Err(err) => {
                CONNECTOR_PROBE_FAILURES.click();
                tracing::warn!(error = %err, "connection probe failed");
                renderer.print_error(&format!("Failed to connect to Groq service: {err}"));
                false
            }
        }
    }

    /// Sends `user_text` as the whole conversation and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResponse`] when the service produced no choice
    /// with content, and the transport or service error otherwise.
    pub async fn complete(&self, user_text: &str) -> Result<String> {
        let completion = self.send(vec![Message::user(user_text)]).await?;
        match completion.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                CONNECTOR_EMPTY_RESPONSES.click();
                Err(Error::empty_response("completion contained no choices"))
            }
        }
    }

    async fn send(&self, messages: Vec<Message>) -> Result<ChatCompletion> {
        let request = ChatCompletionRequest::new(self.model.clone(), messages)
            .with_max_tokens(self.max_tokens);
        self.service.create(request).await
    }
}
