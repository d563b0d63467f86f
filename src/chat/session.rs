//! The interactive session loop.
//!
//! A [`ChatSession`] moves through three states.  `start` prints the banner,
//! probes the service, and enters [`SessionState::Running`] whatever the
//! probe found.  Each line read while running is either a command or a
//! query; `exit` (or end of input) prints the farewell and ends the session.
//! Failures from the service or the history log are reported and the loop
//! continues; only an input failure leaves [`ChatSession::run`] early.

use crate::chat::commands::{ChatCommand, banner, parse_command};
use crate::chat::input::{LineSource, PROMPT};
use crate::connector::{CompletionService, Connector};
use crate::error::Result;
use crate::history::{ClearOutcome, HistoryLog};
use crate::observability::{SESSION_COMMANDS, SESSION_QUERIES};
use crate::render::Renderer;
use crate::types::Model;

/// Reply shown and logged when the service could not be reached or failed.
pub const ERROR_REPLY: &str = "Error communicating with Groq service.";

/// Reply shown and logged when the service answered without any choices.
pub const NO_RESPONSE_REPLY: &str = "No response from Groq service.";

/// Printed when the session ends.
pub const FAREWELL: &str = "Ending session. Goodbye!";

/// Where a session is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Created; banner not yet shown.
    Start,
    /// Accepting input.
    Running,
    /// Finished; no further input is handled.
    Ended,
}

/// A chat session tying the connector to the history log.
pub struct ChatSession<S: CompletionService> {
    connector: Connector<S>,
    history: HistoryLog,
    state: SessionState,
}

impl<S: CompletionService> ChatSession<S> {
    /// Creates a new session in [`SessionState::Start`].
    pub fn new(connector: Connector<S>, history: HistoryLog) -> Self {
        Self {
            connector,
            history,
            state: SessionState::Start,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the model queries are sent to.
    pub fn model(&self) -> &Model {
        self.connector.model()
    }

    /// Returns the conversation log.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Prints the banner, probes the service, and starts accepting input.
    pub async fn start(&mut self, renderer: &mut dyn Renderer) {
        renderer.print_info(banner());
        self.connector.probe_connection(renderer).await;
        self.state = SessionState::Running;
    }

    /// Runs the session until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input fails.
    pub async fn run(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        if self.state == SessionState::Start {
            self.start(renderer).await;
        }
        while self.state == SessionState::Running {
            match input.read_line(PROMPT)? {
                Some(line) => {
                    self.handle_line(&line, renderer).await;
                }
                None => self.end(renderer),
            }
        }
        Ok(())
    }

    /// Handles one line of input and returns the resulting state.
    pub async fn handle_line(
        &mut self,
        line: &str,
        renderer: &mut dyn Renderer,
    ) -> SessionState {
        if self.state == SessionState::Ended {
            return self.state;
        }
        match parse_command(line) {
            Some(command) => {
                SESSION_COMMANDS.click();
                tracing::debug!(?command, "handling command");
                self.handle_command(command, renderer);
            }
            None => {
                SESSION_QUERIES.click();
                self.handle_query(line, renderer).await;
            }
        }
        self.state
    }

    fn handle_command(&mut self, command: ChatCommand, renderer: &mut dyn Renderer) {
        match command {
            ChatCommand::Exit => self.end(renderer),
            ChatCommand::History => match self.history.read_all() {
                Ok(text) => renderer.print_text(&text),
                Err(err) => renderer.print_error(&format!("Failed to read history: {err}")),
            },
            ChatCommand::ClearHistory => match self.history.clear() {
                Ok(ClearOutcome::Cleared) => {
                    renderer.print_info("Conversation history cleared.")
                }
                Ok(ClearOutcome::NothingToClear) => renderer.print_info("No history to clear."),
                Err(err) => renderer.print_error(&format!("Failed to clear history: {err}")),
            },
        }
    }

    async fn handle_query(&mut self, line: &str, renderer: &mut dyn Renderer) {
        let result = self.connector.complete(line).await;
        let reply = reply_for(result, renderer);
        renderer.print_reply(&reply);
        if let Err(err) = self.history.append(line, &reply) {
            renderer.print_error(&format!("Failed to save conversation: {err}"));
        }
    }

    fn end(&mut self, renderer: &mut dyn Renderer) {
        renderer.print_info(FAREWELL);
        self.state = SessionState::Ended;
    }
}

/// Turns the outcome of a completion into the text shown and logged.
///
/// Failures are reported through `renderer` and replaced by a fixed reply
/// so the session always has something to display.
pub fn reply_for(result: Result<String>, renderer: &mut dyn Renderer) -> String {
    match result {
        Ok(text) => text,
        Err(err) if err.is_empty_response() => {
            renderer.print_error("No response received from Groq service.");
            NO_RESPONSE_REPLY.to_string()
        }
        Err(err) => {
            renderer.print_error(&format!("Error communicating with Groq service: {err}"));
            ERROR_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use utf8path::Path;

    use super::*;
    use crate::error::Error;
    use crate::history::NO_HISTORY;
    use crate::types::{ChatCompletion, ChatCompletionRequest, Choice, MessageRole};

    #[derive(Default)]
    struct RecordingRenderer {
        text: Vec<String>,
        replies: Vec<String>,
        info: Vec<String>,
        errors: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn print_text(&mut self, text: &str) {
            self.text.push(text.to_string());
        }

        fn print_reply(&mut self, reply: &str) {
            self.replies.push(reply.to_string());
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, info: &str) {
            self.info.push(info.to_string());
        }
    }

    /// Answers user messages from a script; system messages always succeed.
    struct ScriptedService {
        replies: Mutex<VecDeque<Result<ChatCompletion>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn with(replies: Vec<Result<ChatCompletion>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn create(&self, request: ChatCompletionRequest) -> Result<ChatCompletion> {
            let message = &request.messages[0];
            if message.role == MessageRole::System {
                return Ok(text("connected"));
            }
            self.queries.lock().unwrap().push(message.content.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::input("script exhausted")))
        }
    }

    struct ScriptedInput(VecDeque<&'static str>);

    impl LineSource for ScriptedInput {
        fn read_line(&mut self, _: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }
    }

    fn text(reply: &str) -> ChatCompletion {
        ChatCompletion {
            choices: vec![Choice::assistant(reply)],
            ..ChatCompletion::default()
        }
    }

    fn session_in(
        dir: &tempfile::TempDir,
        service: Arc<ScriptedService>,
    ) -> ChatSession<Arc<ScriptedService>> {
        let path = Path::try_from(dir.path().join("history.txt"))
            .unwrap()
            .into_owned();
        ChatSession::new(
            Connector::new(service, Model::default()),
            HistoryLog::new(path),
        )
    }

    #[tokio::test]
    async fn start_enters_running_even_when_probe_fails() {
        struct Down;

        #[async_trait]
        impl CompletionService for Down {
            async fn create(&self, _: ChatCompletionRequest) -> Result<ChatCompletion> {
                Err(Error::connection("refused", None))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = Path::try_from(dir.path().join("h.txt")).unwrap().into_owned();
        let mut session = ChatSession::new(
            Connector::new(Down, Model::default()),
            HistoryLog::new(path),
        );
        let mut renderer = RecordingRenderer::default();
        assert_eq!(session.state(), SessionState::Start);
        session.start(&mut renderer).await;
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(renderer.info[0], banner());
        assert!(renderer.errors[0].starts_with("Failed to connect to Groq service"));
    }

    #[tokio::test]
    async fn query_is_displayed_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![Ok(text("hi there"))]);
        let mut session = session_in(&dir, service.clone());
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        let state = session.handle_line("hello", &mut renderer).await;
        assert_eq!(state, SessionState::Running);
        assert_eq!(service.queries(), vec!["hello"]);
        assert_eq!(renderer.replies, vec!["hi there"]);

        let log = session.history().read_all().unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert!(lines[0].ends_with("User: hello"));
        assert!(lines[1].ends_with("Bot: hi there"));
    }

    #[tokio::test]
    async fn exit_ends_without_calling_service() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![]);
        let mut session = session_in(&dir, service.clone());
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        assert_eq!(
            session.handle_line("EXIT", &mut renderer).await,
            SessionState::Ended
        );
        assert!(service.queries().is_empty());
        assert_eq!(renderer.info.last().map(String::as_str), Some(FAREWELL));
        assert_eq!(session.history().read_all().unwrap(), NO_HISTORY);

        assert_eq!(
            session.handle_line("hello", &mut renderer).await,
            SessionState::Ended
        );
        assert!(service.queries().is_empty());
    }

    #[tokio::test]
    async fn transport_error_becomes_logged_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![Err(Error::connection("reset", None))]);
        let mut session = session_in(&dir, service);
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        session.handle_line("ping", &mut renderer).await;
        assert_eq!(renderer.replies, vec![ERROR_REPLY]);
        assert!(
            renderer
                .errors
                .iter()
                .any(|e| e.starts_with("Error communicating with Groq service: "))
        );
        let log = session.history().read_all().unwrap();
        assert!(log.contains(&format!("Bot: {ERROR_REPLY}")));
        assert!(log.contains("User: ping"));
    }

    #[tokio::test]
    async fn empty_response_becomes_logged_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![Ok(ChatCompletion::default())]);
        let mut session = session_in(&dir, service);
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        session.handle_line("anyone?", &mut renderer).await;
        assert_eq!(renderer.replies, vec![NO_RESPONSE_REPLY]);
        assert_eq!(renderer.errors, vec!["No response received from Groq service."]);
        assert!(
            session
                .history()
                .read_all()
                .unwrap()
                .contains(&format!("Bot: {NO_RESPONSE_REPLY}"))
        );
    }

    #[tokio::test]
    async fn history_and_clear_commands() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![Ok(text("pong"))]);
        let mut session = session_in(&dir, service.clone());
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        session.handle_line("history", &mut renderer).await;
        assert_eq!(renderer.text, vec![NO_HISTORY]);

        session.handle_line("ping", &mut renderer).await;
        session.handle_line("History", &mut renderer).await;
        assert!(renderer.text[1].contains("User: ping"));
        assert!(renderer.text[1].contains("Bot: pong"));

        session.handle_line("clear history", &mut renderer).await;
        session.handle_line("CLEAR HISTORY", &mut renderer).await;
        assert!(renderer.info.contains(&"Conversation history cleared.".to_string()));
        assert!(renderer.info.contains(&"No history to clear.".to_string()));

        session.handle_line("history", &mut renderer).await;
        assert_eq!(renderer.text.last().map(String::as_str), Some(NO_HISTORY));
        assert_eq!(service.queries(), vec!["ping"]);
    }

    #[tokio::test]
    async fn log_failure_does_not_stop_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = Path::try_from(dir.path().join("missing").join("h.txt"))
            .unwrap()
            .into_owned();
        let service = ScriptedService::with(vec![Ok(text("still here"))]);
        let mut session = ChatSession::new(
            Connector::new(service, Model::default()),
            HistoryLog::new(path),
        );
        let mut renderer = RecordingRenderer::default();
        session.start(&mut renderer).await;

        let state = session.handle_line("hello", &mut renderer).await;
        assert_eq!(state, SessionState::Running);
        assert_eq!(renderer.replies, vec!["still here"]);
        assert!(renderer.errors[0].starts_with("Failed to save conversation"));
    }

    #[tokio::test]
    async fn run_until_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScriptedService::with(vec![Ok(text("one")), Ok(text("two"))]);
        let mut session = session_in(&dir, service.clone());
        let mut renderer = RecordingRenderer::default();
        let mut input = ScriptedInput(VecDeque::from(["first", "", "exit", "never sent"]));

        session.run(&mut input, &mut renderer).await.unwrap();
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(service.queries(), vec!["first", ""]);
        assert_eq!(renderer.replies, vec!["one", "two"]);
        assert_eq!(input.0, VecDeque::from(["never sent"]));

        let mut session = session_in(&dir, ScriptedService::with(vec![]));
        let mut input = ScriptedInput(VecDeque::new());
        session.run(&mut input, &mut renderer).await.unwrap();
        assert_eq!(session.state(), SessionState::Ended);
    }

    #[tokio::test]
    async fn input_failure_leaves_run() {
        struct Broken;

        impl LineSource for Broken {
            fn read_line(&mut self, _: &str) -> Result<Option<String>> {
                Err(Error::abort("interrupted at prompt"))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir, ScriptedService::with(vec![]));
        let mut renderer = RecordingRenderer::default();
        let err = session.run(&mut Broken, &mut renderer).await.unwrap_err();
        assert!(err.is_abort());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn reply_for_success_is_untouched() {
        let mut renderer = RecordingRenderer::default();
        assert_eq!(reply_for(Ok("fine".to_string()), &mut renderer), "fine");
        assert!(renderer.errors.is_empty());
    }
}
