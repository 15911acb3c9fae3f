//! Consent gate.
//!
//! Two independent flags captured by the consent surface before the chat
//! becomes interactive. The router may only be invoked once both are set.

use serde::{Deserialize, Serialize};

/// Consent decision state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    /// Terms of use accepted.
    pub terms: bool,
    /// Privacy policy accepted.
    pub privacy: bool,
}

impl ConsentState {
    pub fn new(terms: bool, privacy: bool) -> Self {
        Self { terms, privacy }
    }

    /// Both flags must be affirmative.
    pub fn accepted(&self) -> bool {
        self.terms && self.privacy
    }
}
