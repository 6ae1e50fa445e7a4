//! Debate transcript messages.

use crate::council::node::{Node, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved speaker identifier for the human participant.
pub const USER_SPEAKER_ID: &str = "user";

/// Sequence-based message identity.
///
/// Ids are assigned in commit order and are authoritative for transcript
/// ordering; timestamps are informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who contributed a message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Speaker {
    Node(NodeId),
    User,
}

impl Speaker {
    pub fn is_user(&self) -> bool {
        matches!(self, Speaker::User)
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Speaker::Node(id) => Some(id),
            Speaker::User => None,
        }
    }

    /// Display name resolved against a roster; unknown nodes render as "Unknown".
    pub fn display_name<'a>(&self, roster: &'a [Node], user_label: &'a str) -> &'a str {
        match self {
            Speaker::User => user_label,
            Speaker::Node(id) => roster
                .iter()
                .find(|n| &n.id == id)
                .map(|n| n.name.as_str())
                .unwrap_or("Unknown"),
        }
    }
}

impl Serialize for Speaker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Speaker::User => serializer.serialize_str(USER_SPEAKER_ID),
            Speaker::Node(id) => serializer.serialize_str(id.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Speaker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s == USER_SPEAKER_ID {
            Speaker::User
        } else {
            Speaker::Node(NodeId::new(s))
        })
    }
}

/// One contribution to the live transcript (Entity, append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateMessage {
    pub id: MessageId,
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl DebateMessage {
    pub fn new(id: MessageId, speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            id,
            speaker,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_user(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, Speaker::User, content)
    }

    pub fn from_node(id: MessageId, node: &NodeId, content: impl Into<String>) -> Self {
        Self::new(id, Speaker::Node(node.clone()), content)
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
