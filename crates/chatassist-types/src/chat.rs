//! Exchange and thread types.
//!
//! A [`ChatExchange`] pairs a prompt with its response. A
//! [`ConversationThread`] is one [`SystemChatMessage`] followed by exchanges in
//! chronological order, which is the turn order sent to the LLM.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use std::fmt;

use crate::error::ValidationError;
use crate::message::{ChatMessage, MessageRole, SystemChatMessage};

/// One prompt/response pair within a conversation.
///
/// No role constraint is placed on either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub prompt: ChatMessage,
    pub response: ChatMessage,
}

impl ChatExchange {
    pub fn new(prompt: ChatMessage, response: ChatMessage) -> Self {
        Self { prompt, response }
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string(self).map_err(|e| ValidationError::Serialization(e.to_string()))
    }

    pub fn to_wire(&self, include_id: bool) -> Value {
        json!({
            "prompt": self.prompt.to_wire(include_id),
            "response": self.response.to_wire(include_id),
        })
    }
}

impl fmt::Display for ChatExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.prompt, self.response)
    }
}

/// Stored shape of a thread. Parsed in full before any thread state changes.
#[derive(Serialize, Deserialize)]
struct ThreadRecord<S, E> {
    system_message: S,
    exchanges: E,
}

/// An ordered conversation anchored by a single system message.
///
/// The thread may also hold a pending `next_prompt`: a user message that has
/// been written but not yet answered. It is transient and is not part of the
/// serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationThread {
    system_message: SystemChatMessage,
    exchanges: Vec<ChatExchange>,
    next_prompt: Option<ChatMessage>,
}

impl ConversationThread {
    pub fn new(system_message: SystemChatMessage) -> Self {
        Self {
            system_message,
            exchanges: Vec::new(),
            next_prompt: None,
        }
    }

    /// Parse a thread from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let record: ThreadRecord<SystemChatMessage, Vec<ChatExchange>> =
            serde_json::from_str(json)?;
        Ok(Self {
            system_message: record.system_message,
            exchanges: record.exchanges,
            next_prompt: None,
        })
    }

    pub fn system_message(&self) -> &SystemChatMessage {
        &self.system_message
    }

    pub fn set_system_message(&mut self, system_message: SystemChatMessage) {
        self.system_message = system_message;
    }

    pub fn exchanges(&self) -> &[ChatExchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Add an exchange at the end of the conversation.
    pub fn append(&mut self, exchange: ChatExchange) {
        self.exchanges.push(exchange);
    }

    pub fn extend(&mut self, exchanges: impl IntoIterator<Item = ChatExchange>) {
        self.exchanges.extend(exchanges);
    }

    pub fn next_prompt(&self) -> Option<&ChatMessage> {
        self.next_prompt.as_ref()
    }

    /// Stage the user message that the next LLM call should answer.
    pub fn set_next_prompt(&mut self, prompt: ChatMessage) -> Result<(), ValidationError> {
        if prompt.role() != MessageRole::User {
            return Err(ValidationError::RoleMismatch {
                expected: MessageRole::User,
                actual: prompt.role(),
            });
        }
        self.next_prompt = Some(prompt);
        Ok(())
    }

    pub fn take_next_prompt(&mut self) -> Option<ChatMessage> {
        self.next_prompt.take()
    }

    /// Pair the pending prompt with `response` and append the new exchange.
    pub fn complete_next_prompt(&mut self, response: ChatMessage) -> Result<(), ValidationError> {
        let prompt = self.next_prompt.take().ok_or_else(|| {
            ValidationError::Conversation("no pending prompt to complete".to_string())
        })?;
        self.exchanges.push(ChatExchange::new(prompt, response));
        Ok(())
    }

    /// Messages in the order they are sent to an LLM: the system message,
    /// each prompt followed by its response, then the pending prompt if any.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 * self.exchanges.len() + 2);
        messages.push(self.system_message.to_chat_message());
        for exchange in &self.exchanges {
            messages.push(exchange.prompt.clone());
            messages.push(exchange.response.clone());
        }
        if let Some(prompt) = &self.next_prompt {
            messages.push(prompt.clone());
        }
        messages
    }

    /// Serialize to `{"system_message": ..., "exchanges": [...]}`.
    pub fn serialize(&self) -> Result<String, ValidationError> {
        let record = ThreadRecord {
            system_message: &self.system_message,
            exchanges: &self.exchanges,
        };
        serde_json::to_string(&record).map_err(|e| ValidationError::Serialization(e.to_string()))
    }

    /// Replace this thread's contents with the thread encoded in `json`.
    ///
    /// The document is parsed and validated in full first. On error the thread
    /// is left exactly as it was. On success the system message and exchanges
    /// are replaced and any pending prompt is cleared.
    pub fn deserialize(&mut self, json: &str) -> Result<(), ValidationError> {
        let parsed = Self::from_json(json)?;
        debug!(exchanges = parsed.exchanges.len(), "Thread deserialized");
        *self = parsed;
        Ok(())
    }

    pub fn to_wire(&self, include_id: bool) -> Value {
        json!({
            "system_message": self.system_message.to_chat_message().to_wire(include_id),
            "exchanges": self
                .exchanges
                .iter()
                .map(|exchange| exchange.to_wire(include_id))
                .collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for ConversationThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.system_message)?;
        for exchange in &self.exchanges {
            write!(f, "\n{exchange}")?;
        }
        Ok(())
    }
}
