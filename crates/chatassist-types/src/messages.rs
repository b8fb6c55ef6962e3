//! Flat, ordered collection of chat messages.
//!
//! Used where a conversation is handled as a plain message list rather than
//! system message plus exchanges (e.g., provider message arrays).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ValidationError;
use crate::message::{ChatMessage, MessageId, MessageRole};

/// An ordered list of [`ChatMessage`]s, addressable by id.
///
/// Serializes as a JSON array of `{"id", "role", "content"}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessages {
    messages: Vec<ChatMessage>,
}

impl ChatMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a message, append it, and return a reference to it.
    pub fn create(&mut self, role: MessageRole, content: impl Into<String>) -> &ChatMessage {
        let index = self.messages.len();
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[index]
    }

    pub fn add(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Remove the message with `id`, returning it.
    pub fn remove(&mut self, id: &MessageId) -> Result<ChatMessage, ValidationError> {
        let position = self
            .messages
            .iter()
            .position(|message| message.id() == id)
            .ok_or_else(|| ValidationError::MessageNotFound(id.to_string()))?;
        Ok(self.messages.remove(position))
    }

    pub fn get(&self, id: &MessageId) -> Result<&ChatMessage, ValidationError> {
        self.messages
            .iter()
            .find(|message| message.id() == id)
            .ok_or_else(|| ValidationError::MessageNotFound(id.to_string()))
    }

    pub fn list(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn to_wire(&self, include_id: bool) -> Value {
        Value::Array(
            self.messages
                .iter()
                .map(|message| message.to_wire(include_id))
                .collect(),
        )
    }

    pub fn serialize(&self) -> Result<String, ValidationError> {
        serde_json::to_string(self).map_err(|e| ValidationError::Serialization(e.to_string()))
    }

    /// Replace the contents with the messages encoded in `json`.
    ///
    /// Leaves the collection untouched if any message fails to parse.
    pub fn deserialize(&mut self, json: &str) -> Result<(), ValidationError> {
        let parsed: Vec<ChatMessage> = serde_json::from_str(json)?;
        debug!(messages = parsed.len(), "Message list deserialized");
        self.messages = parsed;
        Ok(())
    }
}

impl From<Vec<ChatMessage>> for ChatMessages {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

impl FromIterator<ChatMessage> for ChatMessages {
    fn from_iter<I: IntoIterator<Item = ChatMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChatMessages {
    type Item = ChatMessage;
    type IntoIter = std::vec::IntoIter<ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChatMessages {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_and_get() {
        let mut messages = ChatMessages::new();
        let id = messages.create(MessageRole::User, "hello").id().clone();
        messages.create(MessageRole::Assistant, "hi there");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages.get(&id).unwrap().content(), "hello");
    }

    #[test]
    fn test_get_unknown_id() {
        let messages = ChatMessages::new();
        let id: MessageId = "missing".parse().unwrap();
        assert_eq!(
            messages.get(&id).unwrap_err(),
            ValidationError::MessageNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_remove() {
        let mut messages = ChatMessages::new();
        let first = ChatMessage::user("one");
        messages.add(first.clone());
        messages.add(ChatMessage::assistant("two"));

        assert_eq!(messages.remove(first.id()).unwrap(), first);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages.list()[0].content(), "two");
        assert!(matches!(
            messages.remove(first.id()),
            Err(ValidationError::MessageNotFound(_))
        ));
    }

    #[test]
    fn test_to_wire_without_ids() {
        let messages: ChatMessages =
            vec![ChatMessage::system("rules"), ChatMessage::user("hi")].into();
        assert_eq!(
            messages.to_wire(false),
            json!([
                {"role": "system", "content": "rules"},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let messages: ChatMessages = ["a", "b", "c"].into_iter().map(ChatMessage::user).collect();
        let json_str = messages.serialize().unwrap();
        assert!(json_str.starts_with("[{\"id\":"));

        let mut restored = ChatMessages::new();
        restored.deserialize(&json_str).unwrap();
        assert_eq!(restored, messages);
    }

    #[test]
    fn test_deserialize_failure_leaves_state() {
        let mut messages: ChatMessages = vec![ChatMessage::user("keep")].into();
        let before = messages.clone();
        let bad = r#"[{"id":"a","role":"user","content":"x"},{"id":"b","role":"user"}]"#;
        assert!(matches!(
            messages.deserialize(bad),
            Err(ValidationError::MalformedJson(_))
        ));
        assert!(messages.deserialize(r#"{"messages": []}"#).is_err());
        assert_eq!(messages, before);
    }
}
