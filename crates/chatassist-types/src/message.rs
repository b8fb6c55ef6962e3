//! Chat message types: the atomic unit every conversation is built from.
//!
//! A [`ChatMessage`] carries an id, a [`MessageRole`], and text content. A
//! [`SystemChatMessage`] is the role-fixed variant that anchors a thread; it
//! has no role field at all, so its role cannot drift from `system`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Unique identifier for a chat message.
///
/// Freshly generated ids are random UUID v4 strings. Ids read back from JSON
/// may be any non-empty string so messages minted elsewhere keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Generate a new random message id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MessageId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(value))
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

/// Role of the speaker of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub const ALL: [MessageRole; 3] = [
        MessageRole::User,
        MessageRole::Assistant,
        MessageRole::System,
    ];

    /// Parse a role exactly as it appears on the wire (lowercase only).
    ///
    /// `FromStr` is lenient about case; provider payloads and stored messages
    /// are not.
    pub fn from_wire(s: &str) -> Result<Self, ValidationError> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// Column at which message content starts in the plain-text rendering.
fn content_column() -> usize {
    MessageRole::ALL
        .iter()
        .map(|role| role.as_str().len())
        .max()
        .unwrap_or(0)
        + 2
}

/// A single message in a conversation.
///
/// Immutable once built; serializes as `{"id", "role", "content"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    /// Create a message with a freshly generated id.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self::with_id(MessageId::new(), role, content)
    }

    pub fn with_id(id: MessageId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Parse a message from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string(self).map_err(|e| ValidationError::Serialization(e.to_string()))
    }

    /// Mapping form of the message.
    ///
    /// Provider APIs take `{"role", "content"}` only, so `include_id = false`
    /// drops the id.
    pub fn to_wire(&self, include_id: bool) -> Value {
        if include_id {
            json!({
                "id": self.id.as_str(),
                "role": self.role.as_str(),
                "content": self.content,
            })
        } else {
            json!({
                "role": self.role.as_str(),
                "content": self.content,
            })
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = self.role.as_str();
        let padding = content_column().saturating_sub(role.len());
        write!(f, "{role}:{:padding$}{}", "", self.content)
    }
}

/// The system message that anchors a conversation thread.
///
/// Serializes exactly like a [`ChatMessage`] whose role is `"system"`, and
/// refuses to deserialize from any other role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChatMessage", into = "ChatMessage")]
pub struct SystemChatMessage {
    id: MessageId,
    content: String,
}

impl SystemChatMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(MessageId::new(), content)
    }

    pub fn with_id(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> MessageRole {
        MessageRole::System
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Equivalent plain message: same id and content, role `system`.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::with_id(self.id.clone(), MessageRole::System, self.content.clone())
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string(self).map_err(|e| ValidationError::Serialization(e.to_string()))
    }
}

impl TryFrom<ChatMessage> for SystemChatMessage {
    type Error = ValidationError;

    fn try_from(message: ChatMessage) -> Result<Self, Self::Error> {
        if message.role != MessageRole::System {
            return Err(ValidationError::RoleMismatch {
                expected: MessageRole::System,
                actual: message.role,
            });
        }
        Ok(Self {
            id: message.id,
            content: message.content,
        })
    }
}

impl From<SystemChatMessage> for ChatMessage {
    fn from(message: SystemChatMessage) -> Self {
        ChatMessage::with_id(message.id, MessageRole::System, message.content)
    }
}

impl fmt::Display for SystemChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_chat_message(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_message_role_roundtrip() {
        for role in MessageRole::ALL {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_parse_is_case_insensitive() {
        assert_eq!("Assistant".parse::<MessageRole>().unwrap(), MessageRole::Assistant);
        let err = "tool".parse::<MessageRole>().unwrap_err();
        assert_eq!(err, ValidationError::InvalidRole("tool".to_string()));
    }

    #[test]
    fn test_message_role_from_wire_is_exact() {
        for role in MessageRole::ALL {
            assert_eq!(MessageRole::from_wire(role.as_str()).unwrap(), role);
        }
        for raw in ["USER", "Assistant", "System", " user"] {
            assert_eq!(
                MessageRole::from_wire(raw).unwrap_err(),
                ValidationError::InvalidRole(raw.to_string())
            );
            // serde agrees with the wire parser
            assert!(serde_json::from_value::<MessageRole>(Value::from(raw)).is_err());
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_generated_ids_are_unique_and_non_empty() {
        let ids: HashSet<MessageId> = (0..1000)
            .map(|_| ChatMessage::user("hi").id().clone())
            .collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| !id.as_str().is_empty()));
    }

    #[test]
    fn test_chat_message_wire_shape() {
        let msg = ChatMessage::with_id("m-1".parse().unwrap(), MessageRole::User, "hello");
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"id":"m-1","role":"user","content":"hello"}"#
        );
    }

    #[test]
    fn test_chat_message_json_roundtrip() {
        let msg = ChatMessage::assistant("{\"nested\": \"json content\"}");
        let parsed = ChatMessage::from_json(&msg.to_json().unwrap()).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_chat_message_missing_content_rejected() {
        let err = ChatMessage::from_json(r#"{"id":"a","role":"user"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(ref m) if m.contains("content")));
    }

    #[test]
    fn test_chat_message_missing_id_rejected() {
        let err = ChatMessage::from_json(r#"{"role":"user","content":"x"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(_)));
    }

    #[test]
    fn test_chat_message_empty_id_rejected() {
        let err = ChatMessage::from_json(r#"{"id":"","role":"user","content":"x"}"#).unwrap_err();
        let ValidationError::MalformedJson(msg) = err else {
            panic!("expected MalformedJson, got {err:?}");
        };
        assert!(msg.starts_with("message id must not be empty"));
        assert!(!msg.contains("malformed JSON"));
    }

    #[test]
    fn test_whitespace_id_accepted() {
        let msg = ChatMessage::from_json(r#"{"id":" ","role":"user","content":"x"}"#).unwrap();
        assert_eq!(msg.id().as_str(), " ");
        assert_eq!("".parse::<MessageId>().unwrap_err(), ValidationError::EmptyId);
    }

    #[test]
    fn test_chat_message_unknown_role_rejected() {
        let err = ChatMessage::from_json(r#"{"id":"a","role":"robot","content":"x"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(ref m) if m.contains("robot")));
    }

    #[test]
    fn test_to_wire_without_id() {
        let msg = ChatMessage::user("hi");
        assert_eq!(msg.to_wire(false), json!({"role": "user", "content": "hi"}));
        assert_eq!(msg.to_wire(true)["id"], msg.id().as_str());
    }

    #[test]
    fn test_display_aligns_content() {
        assert_eq!(ChatMessage::user("hi").to_string(), "user:       hi");
        assert_eq!(ChatMessage::assistant("yo").to_string(), "assistant:  yo");
        assert_eq!(SystemChatMessage::new("be brief").to_string(), "system:     be brief");
    }

    #[test]
    fn test_system_message_to_chat_message() {
        let sys = SystemChatMessage::new("You are helpful.");
        let msg = sys.to_chat_message();
        assert_eq!(msg.id(), sys.id());
        assert_eq!(msg.content(), "You are helpful.");
        assert_eq!(msg.role(), MessageRole::System);
    }

    #[test]
    fn test_system_message_from_chat_message() {
        let msg = ChatMessage::system("rules");
        let sys = SystemChatMessage::try_from(msg.clone()).unwrap();
        assert_eq!(sys.id(), msg.id());

        let err = SystemChatMessage::try_from(ChatMessage::user("rules")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RoleMismatch {
                expected: MessageRole::System,
                actual: MessageRole::User,
            }
        );
    }

    #[test]
    fn test_system_message_serializes_as_chat_message() {
        let sys = SystemChatMessage::with_id("s-1".parse().unwrap(), "rules");
        assert_eq!(
            sys.to_json().unwrap(),
            r#"{"id":"s-1","role":"system","content":"rules"}"#
        );
        assert_eq!(SystemChatMessage::from_json(&sys.to_json().unwrap()).unwrap(), sys);
    }

    #[test]
    fn test_system_message_rejects_other_roles() {
        let err = SystemChatMessage::from_json(r#"{"id":"s","role":"assistant","content":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(ref m) if m.contains("system")));
    }
}
