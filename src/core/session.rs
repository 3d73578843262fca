//! Conversation state and the single in-flight request guard.
//!
//! The session is `Idle` or `AwaitingResponse { seq }`. Every submission gets
//! a fresh sequence number; completions carrying any other number are stale
//! (the safety timeout fired, or the conversation was reset) and are dropped.

use tracing::debug;

use crate::api::ApiError;
use crate::core::guidance::diagnostic_for;
use crate::core::message::{Message, MessageId, MessageIdGenerator, MessageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse { seq: u64 },
}

/// A request the caller must now send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub seq: u64,
    pub query: String,
    pub use_cache: bool,
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    state: SessionState,
    last_error: Option<String>,
    ids: MessageIdGenerator,
    last_seq: u64,
    use_cache: bool,
}

impl ChatSession {
    pub fn new(use_cache: bool) -> Self {
        Self {
            messages: Vec::new(),
            state: SessionState::Idle,
            last_error: None,
            ids: MessageIdGenerator::default(),
            last_seq: 0,
            use_cache,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { .. })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    pub fn set_use_cache(&mut self, use_cache: bool) {
        self.use_cache = use_cache;
    }

    pub fn last_user_query(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.is_user())
            .map(|msg| msg.content.as_str())
    }

    /// Starts an exchange. Returns `None` without touching anything when the
    /// query is blank or a request is already outstanding.
    pub fn submit(&mut self, query: &str) -> Option<PendingQuery> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let SessionState::AwaitingResponse { seq } = self.state {
            debug!(seq, "submit ignored while awaiting response");
            return None;
        }

        self.last_seq += 1;
        let seq = self.last_seq;
        let id = self.ids.next_id();
        self.messages.push(Message::user(id, query));
        self.last_error = None;
        self.state = SessionState::AwaitingResponse { seq };
        debug!(seq, "awaiting response");

        Some(PendingQuery {
            seq,
            query: query.to_string(),
            use_cache: self.use_cache,
        })
    }

    fn is_current(&self, seq: u64) -> bool {
        self.state == SessionState::AwaitingResponse { seq }
    }

    /// Applies the outcome of request `seq`. Returns the id of the appended
    /// assistant message, or `None` when the outcome was stale.
    pub fn complete(&mut self, seq: u64, result: Result<String, ApiError>) -> Option<MessageId> {
        if !self.is_current(seq) {
            debug!(seq, state = ?self.state, "discarding stale response");
            return None;
        }

        let content = match result {
            Ok(text) => text,
            Err(err) => {
                let content = diagnostic_for(&err);
                self.last_error = Some(err.to_string());
                content
            }
        };

        let id = self.ids.next_id();
        self.messages
            .push(Message::new(id, MessageRole::Assistant, content));
        self.state = SessionState::Idle;
        debug!(seq, "response applied");
        Some(id)
    }

    /// Fails request `seq` with a timeout if it is still outstanding and
    /// returns the id of the diagnostic message. The request itself keeps
    /// running; its eventual result is stale.
    pub fn safety_timeout(&mut self, seq: u64) -> Option<MessageId> {
        if !self.is_current(seq) {
            return None;
        }
        debug!(seq, "safety timeout released the input");
        self.complete(seq, Err(ApiError::Timeout))
    }

    /// Clears the transcript and the error from any state. Outstanding
    /// requests are not cancelled; their results arrive stale.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.last_error = None;
        self.state = SessionState::Idle;
    }
}
