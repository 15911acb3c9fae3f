//! Chat sessions: state, consent gate, and the turn engine.

pub mod consent;
pub mod engine;
pub mod state;
pub mod types;

pub use consent::ConsentState;
pub use engine::{ChatService, ChatSession, TurnOutcome};
pub use state::{AgentStatus, SessionState};
pub use types::{Message, Sender};
