//! Provider adapters.
//!
//! A [`ChatAdapter`] bridges the conversation model to one LLM provider's
//! wire shape. Adapters do no I/O: transport code builds a payload with
//! [`ChatAdapter::submission_for`], sends it itself, and hands the raw reply
//! back to [`ChatAdapter::parse_response`].

pub mod openai;

use serde_json::Value;

use chatassist_types::{
    ChatExchange, ChatMessage, ChatMessages, ConversationThread, SystemChatMessage, ValidationError,
};

/// Validation and conversion contract for a single LLM provider.
///
/// The trait is object-safe so callers can hold `Box<dyn ChatAdapter>` and
/// pick a provider at runtime.
pub trait ChatAdapter: Send + Sync {
    /// Provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Check that a request payload has the shape this provider expects.
    fn validate_submission(&self, payload: &Value) -> Result<(), ValidationError>;

    /// Check that a payload returned by the provider has the expected shape.
    fn validate_response(&self, payload: &Value) -> Result<(), ValidationError>;

    /// Convert one provider message entry to a message with a fresh id.
    fn message_from_entry(&self, entry: &Value) -> Result<ChatMessage, ValidationError>;

    /// Convert one provider message entry to a system message. Fails unless
    /// the entry's role is `system`.
    fn system_from_entry(&self, entry: &Value) -> Result<SystemChatMessage, ValidationError>;

    /// Convert exactly two entries (prompt, response) to an exchange.
    fn exchange_from_entries(&self, entries: &[Value]) -> Result<ChatExchange, ValidationError>;

    /// Provider entries for an exchange: prompt then response.
    fn exchange_to_entries(&self, exchange: &ChatExchange) -> Vec<Value>;

    /// Build the provider request body for `thread`, in turn order.
    fn build_submission(&self, thread: &ConversationThread) -> Value;

    /// Extract the reply message from a provider response.
    fn parse_response(&self, payload: &Value) -> Result<ChatMessage, ValidationError>;

    /// Rebuild a thread from a provider request body.
    fn parse_submission(&self, payload: &Value) -> Result<ConversationThread, ValidationError>;

    fn messages_from_entries(&self, entries: &[Value]) -> Result<ChatMessages, ValidationError> {
        entries
            .iter()
            .map(|entry| self.message_from_entry(entry))
            .collect()
    }

    /// Build the request body for `thread` and validate it before returning.
    fn submission_for(&self, thread: &ConversationThread) -> Result<Value, ValidationError> {
        let payload = self.build_submission(thread);
        self.validate_submission(&payload)?;
        Ok(payload)
    }
}
