//! The turn engine.
//!
//! `ChatService` bundles the shared, read-only pieces (routing policy,
//! crisis directory, configuration) and opens per-surface sessions.
//! `ChatSession` drives one conversation: each submitted message is
//! screened, appended, routed, and answered. A session is owned by
//! exactly one surface task, so turns are strictly sequential and the
//! history needs no locking.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::error::SessionError;
use crate::policy::{ResponseCategory, RoutingPolicy};
use crate::resources::CrisisDirectory;
use crate::session::state::{AgentStatus, SessionState};
use crate::session::types::Message;

/// Shared service state handed to every channel.
pub struct ChatService {
    policy: Arc<RoutingPolicy>,
    directory: Arc<CrisisDirectory>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(policy: RoutingPolicy, directory: CrisisDirectory, config: ChatConfig) -> Self {
        Self {
            policy: Arc::new(policy),
            directory: Arc::new(directory),
            config,
        }
    }

    /// Open a fresh session, seeded with the greeting message.
    pub fn open_session(&self) -> ChatSession {
        ChatSession::new(
            Arc::clone(&self.policy),
            Arc::clone(&self.directory),
            &self.config,
        )
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn directory(&self) -> &CrisisDirectory {
        &self.directory
    }
}

/// Outcome of one submitted turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Canned categorized reply, already appended to the history.
    Reply(Message),
    /// Crisis path: the surface presents the resource directory instead
    /// of a categorized reply. Nothing is appended for the agent side.
    Crisis {
        notice: String,
        directory: Arc<CrisisDirectory>,
    },
}

/// One conversation, owned by a single surface.
pub struct ChatSession {
    state: SessionState,
    policy: Arc<RoutingPolicy>,
    directory: Arc<CrisisDirectory>,
    typing_delay: Duration,
}

impl ChatSession {
    fn new(policy: Arc<RoutingPolicy>, directory: Arc<CrisisDirectory>, config: &ChatConfig) -> Self {
        let mut state = SessionState::new();
        state.push_agent(Message::agent(
            config.greeting.clone(),
            ResponseCategory::Orchestrator,
        ));

        Self {
            state,
            policy,
            directory,
            typing_delay: config.typing_delay,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Record the consent decision. Returns whether the gate is now open.
    pub fn set_consent(&mut self, terms: bool, privacy: bool) -> bool {
        self.state.set_consent(terms, privacy);
        let accepted = self.state.consent().accepted();
        if accepted {
            info!("Consent granted, chat unlocked");
        }
        accepted
    }

    /// Submit one user message and drive the turn to completion.
    ///
    /// Screens the session-level preconditions (consent granted, input
    /// non-empty, no turn in flight), appends the user message, routes,
    /// and either sleeps through the simulated agent delay before
    /// appending the canned reply, or returns the crisis directory
    /// immediately. Once routing starts the turn always completes.
    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        if !self.state.consent().accepted() {
            return Err(SessionError::ConsentRequired);
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.state.status() == AgentStatus::Processing {
            return Err(SessionError::Busy);
        }

        self.state.push_user(Message::user(text));
        self.state.set_status(AgentStatus::Processing);

        let decision = self.policy.route(text);

        if decision.is_crisis {
            // No artificial delay: the crisis path short-circuits the
            // simulated round-trip and suppresses the categorized reply.
            self.state.set_status(AgentStatus::Crisis);
            return Ok(TurnOutcome::Crisis {
                notice: decision.response,
                directory: Arc::clone(&self.directory),
            });
        }

        // Stand-in for the future backend round-trip.
        tokio::time::sleep(self.typing_delay).await;

        let message = Message::agent(decision.response, decision.category);
        self.state.push_agent(message.clone());
        self.state.set_status(AgentStatus::Idle);
        debug!(category = message.category.map(|c| c.label()).unwrap_or("-"), "Turn completed");

        Ok(TurnOutcome::Reply(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Sender;

    fn service() -> ChatService {
        let config = ChatConfig {
            typing_delay: Duration::ZERO,
            ..ChatConfig::default()
        };
        ChatService::new(RoutingPolicy::with_defaults(), CrisisDirectory::default(), config)
    }

    fn open_consented() -> ChatSession {
        let mut session = service().open_session();
        session.set_consent(true, true);
        session
    }

    #[test]
    fn new_session_is_seeded_with_greeting() {
        let session = service().open_session();
        let history = session.state().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, Sender::Agent);
        assert_eq!(history[0].category, Some(ResponseCategory::Orchestrator));
    }

    #[tokio::test]
    async fn submit_without_consent_is_rejected() {
        let mut session = service().open_session();
        let err = session.submit("Hallo").await.unwrap_err();
        assert_eq!(err, SessionError::ConsentRequired);
        // Nothing was appended.
        assert_eq!(session.state().history().len(), 1);
    }

    #[tokio::test]
    async fn partial_consent_keeps_gate_closed() {
        let mut session = service().open_session();
        assert!(!session.set_consent(true, false));
        let err = session.submit("Hallo").await.unwrap_err();
        assert_eq!(err, SessionError::ConsentRequired);
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_routing() {
        let mut session = open_consented();
        assert_eq!(
            session.submit("   ").await.unwrap_err(),
            SessionError::EmptyMessage
        );
        assert_eq!(session.state().history().len(), 1);
    }

    #[tokio::test]
    async fn turn_appends_user_before_agent() {
        let mut session = open_consented();
        let outcome = session.submit("Hallo").await.unwrap();

        let history = session.state().history();
        assert_eq!(history.len(), 3); // greeting, user, reply
        assert_eq!(history[1].sender, Sender::User);
        assert_eq!(history[1].content, "Hallo");
        assert_eq!(history[2].sender, Sender::Agent);

        match outcome {
            TurnOutcome::Reply(message) => {
                assert_eq!(message.category, Some(ResponseCategory::Orchestrator));
                assert_eq!(history[2].id, message.id);
            }
            other => panic!("expected Reply, got {:?}", other),
        }
        assert_eq!(session.state().status(), AgentStatus::Idle);
    }

    #[tokio::test]
    async fn help_message_routes_to_help_finder() {
        let mut session = open_consented();
        match session.submit("Ich brauche Hilfe").await.unwrap() {
            TurnOutcome::Reply(message) => {
                assert_eq!(message.category, Some(ResponseCategory::HelpFinder));
            }
            other => panic!("expected Reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn crisis_turn_suppresses_categorized_reply() {
        let mut session = open_consented();
        let outcome = session.submit("ich möchte nicht mehr leben").await.unwrap();

        match outcome {
            TurnOutcome::Crisis { notice, directory } => {
                assert!(notice.contains("nicht allein"));
                assert_eq!(directory.contacts.len(), 4);
            }
            other => panic!("expected Crisis, got {:?}", other),
        }

        // The user message is in the history, but no agent reply followed.
        let history = session.state().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].sender, Sender::User);
        assert_eq!(session.state().status(), AgentStatus::Crisis);
    }

    #[tokio::test]
    async fn chat_continues_after_crisis() {
        let mut session = open_consented();
        session.submit("ich möchte nicht mehr leben").await.unwrap();

        // The modal is closeable; the next turn routes normally.
        match session.submit("Was ist Depression?").await.unwrap() {
            TurnOutcome::Reply(message) => {
                assert_eq!(message.category, Some(ResponseCategory::Information));
            }
            other => panic!("expected Reply, got {:?}", other),
        }
        assert_eq!(session.state().status(), AgentStatus::Idle);
    }

    #[tokio::test]
    async fn in_flight_turn_rejects_submission() {
        let mut session = open_consented();
        // Simulate a turn left in flight by its owner.
        session.state.set_status(AgentStatus::Processing);
        assert_eq!(
            session.submit("Hallo").await.unwrap_err(),
            SessionError::Busy
        );
    }
}
