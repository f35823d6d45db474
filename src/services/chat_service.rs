//! The chat surface: ordered conversation log plus submission state machine.

use std::sync::Arc;

use tracing::info;

use crate::models::{Message, Resource, ResourceRecord};
use crate::services::auth_service::{IdentityProvider, SessionStore};
use crate::services::query_service::AnsweringService;

/// Submission state. `submit` is a no-op while a query is in flight, so at
/// most one exchange is outstanding at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    AwaitingResponse,
}

/// Orchestrates one chat session: owns the message log, the submission
/// state, and the transient error banner.
///
/// The log is append-only from here: messages are never edited, removed or
/// reordered. A failed exchange keeps the already-appended user message and
/// sets the error banner instead of appending an assistant message.
pub struct ChatController<P, A> {
    session: Arc<SessionStore<P>>,
    answering: A,
    log: Vec<Message>,
    state: SubmitState,
    error: Option<String>,
}

impl<P: IdentityProvider, A: AnsweringService> ChatController<P, A> {
    /// New controller with the log seeded with the greeting.
    pub fn new(session: Arc<SessionStore<P>>, answering: A) -> Self {
        Self {
            session,
            answering,
            log: vec![Message::greeting()],
            state: SubmitState::Idle,
            error: None,
        }
    }

    /// The conversation so far, in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Message for the error banner, if the last exchange failed. Cleared by
    /// the next successful exchange.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit one query.
    ///
    /// Blank input and submissions while a query is in flight are ignored.
    /// Otherwise the user message is appended before any network activity,
    /// and the assistant message (or the error banner) follows when the
    /// exchange resolves. Every path ends back at `Idle`.
    pub async fn submit(&mut self, query_text: &str) {
        let query = query_text.trim();
        if query.is_empty() || self.state != SubmitState::Idle {
            return;
        }

        self.log.push(Message::user(query));
        self.state = SubmitState::AwaitingResponse;

        let token = match self.session.access_token().await {
            Ok(token) => token,
            Err(err) => {
                self.error = Some(err.to_string());
                self.state = SubmitState::Idle;
                return;
            }
        };

        match self.answering.ask(query, &token).await {
            Ok(answer) => {
                let resources: Vec<Resource> = answer
                    .resources
                    .into_iter()
                    .filter_map(ResourceRecord::validate)
                    .collect();
                info!(resources = resources.len(), "answer received");
                self.log.push(Message::assistant(answer.text, resources));
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }

        self.state = SubmitState::Idle;
    }
}
