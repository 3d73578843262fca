use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    User,
    Assistant,
    /// Placeholder shown while a request is outstanding. Never stored in the
    /// transcript; the renderer synthesizes it from the loading flag.
    Processing,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Processing => "processing",
        }
    }

    pub fn is_user(self) -> bool {
        self == MessageRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == MessageRole::Assistant
    }
}

impl TryFrom<&str> for MessageRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "processing" => Ok(MessageRole::Processing),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

/// Identifier for a transcript entry. Strictly increasing within a session,
/// so sorting by id reproduces insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    pub fn next_id(&mut self) -> MessageId {
        self.last += 1;
        MessageId(self.last)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(id: MessageId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, MessageRole::User, content)
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, MessageRole::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut ids = MessageIdGenerator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(c.to_string(), "msg-3");
    }

    #[test]
    fn role_strings_round_trip() {
        for role in [
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::Processing,
        ] {
            assert_eq!(MessageRole::try_from(role.as_str()), Ok(role));
        }
        assert!(MessageRole::try_from("system").is_err());
    }

    #[test]
    fn constructors_set_roles() {
        let user = Message::user(MessageId(1), "hi");
        let reply = Message::assistant(MessageId(2), "hello");
        assert!(user.is_user());
        assert!(reply.is_assistant());
        assert_eq!(reply.content, "hello");
    }
}
