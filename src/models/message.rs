use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Resource;

/// Greeting seeded into every new conversation.
pub const GREETING: &str = "Hi! I'm Jiji. What would you like to learn about today?";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation log.
///
/// `resources` is non-empty only for assistant messages; the constructors
/// enforce this. Log order is insertion order and is never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A message typed by the user. Never carries resources.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            resources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// An answer from the assistant, with its validated attachments.
    pub fn assistant(content: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            resources,
            created_at: Utc::now(),
        }
    }

    /// The synthetic greeting that opens every conversation.
    pub fn greeting() -> Self {
        Self::assistant(GREETING, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_never_carry_resources() {
        let message = Message::user("What is photosynthesis?");
        assert_eq!(message.role, Role::User);
        assert!(message.resources.is_empty());
    }

    #[test]
    fn greeting_is_an_assistant_message() {
        let greeting = Message::greeting();
        assert_eq!(greeting.role, Role::Assistant);
        assert_eq!(greeting.content, GREETING);
        assert!(greeting.resources.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }
}
