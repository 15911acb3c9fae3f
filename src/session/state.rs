//! Explicit session state, updated only through discrete transitions.
//!
//! Replaces the scattered per-surface flags of the original widget with
//! one state object, so the router's precondition (consent granted) and
//! postcondition (history appended) are testable without any surface
//! attached. History is append-only for the lifetime of the session and
//! discarded with it.

use serde::Serialize;

use crate::session::consent::ConsentState;
use crate::session::types::{Message, Sender};

/// Presence indicator for the agent side of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Processing,
    Crisis,
    Error,
}

/// State of one chat session.
#[derive(Debug)]
pub struct SessionState {
    consent: ConsentState,
    history: Vec<Message>,
    status: AgentStatus,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            consent: ConsentState::default(),
            history: Vec::new(),
            status: AgentStatus::Idle,
        }
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Record the consent decision as reported by the consent surface.
    pub fn set_consent(&mut self, terms: bool, privacy: bool) {
        self.consent = ConsentState::new(terms, privacy);
    }

    /// Append a user message.
    pub fn push_user(&mut self, message: Message) {
        debug_assert_eq!(message.sender, Sender::User);
        self.history.push(message);
    }

    /// Append an agent message.
    pub fn push_agent(&mut self, message: Message) {
        debug_assert_eq!(message.sender, Sender::Agent);
        self.history.push(message);
    }

    pub fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn consent(&self) -> ConsentState {
        self.consent
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn last(&self) -> Option<&Message> {
        self.history.last()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
