//! Shared session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::ResponseCategory;
use crate::resources::ResourceLink;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// A single chat message. Immutable once created and appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Which agent persona authored this message. Agent messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ResponseCategory>,
    /// Resources recommended alongside the message text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceLink>,
}

impl Message {
    /// A message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            category: None,
            resources: Vec::new(),
        }
    }

    /// A message authored by an agent persona.
    pub fn agent(content: impl Into<String>, category: ResponseCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::Agent,
            timestamp: Utc::now(),
            category: Some(category),
            resources: Vec::new(),
        }
    }

    /// Attach recommended resources.
    pub fn with_resources(mut self, resources: Vec<ResourceLink>) -> Self {
        self.resources = resources;
        self
    }
}
