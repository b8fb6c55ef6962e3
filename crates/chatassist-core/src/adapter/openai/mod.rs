//! OpenAI chat completions adapter.
//!
//! Request shape: `{"model": "...", "messages": [{"role", "content"}, ...]}`.
//! Response shape: `{"choices": [{"message": {"role", "content"}}, ...]}`.
//! Other OpenAI-compatible providers share these shapes and can reuse this
//! adapter with a different model in [`OpenAiAdapterConfig`].

pub mod config;

use serde_json::{Value, json};
use tracing::{debug, warn};

use chatassist_types::{
    ChatExchange, ChatMessage, ConversationThread, MessageRole, SystemChatMessage, ValidationError,
};

pub use self::config::OpenAiAdapterConfig;

use super::ChatAdapter;

const PROVIDER_NAME: &str = "openai";

/// Adapter for the OpenAI chat completions API.
#[derive(Debug, Clone, Default)]
pub struct OpenAiAdapter {
    config: OpenAiAdapterConfig,
}

impl OpenAiAdapter {
    pub fn new(config: OpenAiAdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OpenAiAdapterConfig {
        &self.config
    }

    fn check_submission(&self, payload: &Value) -> Result<(), ValidationError> {
        let object = payload
            .as_object()
            .ok_or_else(|| submission_error("payload must be a JSON object"))?;

        if let Some(model) = object.get("model") {
            match model.as_str() {
                Some(m) if !m.trim().is_empty() => {}
                _ => return Err(submission_error("'model' must be a non-empty string")),
            }
        }

        let messages = object
            .get("messages")
            .ok_or_else(|| submission_error("missing 'messages' key"))?
            .as_array()
            .ok_or_else(|| submission_error("'messages' must be an array"))?;

        if messages.is_empty() {
            return Err(submission_error("'messages' must not be empty"));
        }

        if let Some(max) = self.config.max_messages {
            if messages.len() > max {
                return Err(ValidationError::Submission(format!(
                    "{} messages exceed the limit of {max}",
                    messages.len()
                )));
            }
        }

        for (index, entry) in messages.iter().enumerate() {
            let problems = message_problems(entry);
            if !problems.is_empty() {
                return Err(ValidationError::Submission(format!(
                    "messages[{index}]: {}",
                    problems.join("; ")
                )));
            }
        }

        Ok(())
    }

    fn check_response(&self, payload: &Value) -> Result<(), ValidationError> {
        let object = payload
            .as_object()
            .ok_or_else(|| response_error("payload must be a JSON object"))?;

        let choices = object
            .get("choices")
            .ok_or_else(|| response_error("missing 'choices' key"))?
            .as_array()
            .ok_or_else(|| response_error("'choices' must be an array"))?;

        if choices.is_empty() {
            return Err(response_error("'choices' must not be empty"));
        }

        for (index, choice) in choices.iter().enumerate() {
            let message = choice.get("message").ok_or_else(|| {
                ValidationError::Response(format!("choices[{index}] is missing 'message'"))
            })?;
            let problems = message_problems(message);
            if !problems.is_empty() {
                return Err(ValidationError::Response(format!(
                    "choices[{index}].message: {}",
                    problems.join("; ")
                )));
            }
        }

        Ok(())
    }
}

impl ChatAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn validate_submission(&self, payload: &Value) -> Result<(), ValidationError> {
        self.check_submission(payload)
            .inspect(|_| debug!(adapter = PROVIDER_NAME, "Submission payload accepted"))
            .inspect_err(|err| {
                warn!(adapter = PROVIDER_NAME, error = %err, "Submission payload rejected")
            })
    }

    fn validate_response(&self, payload: &Value) -> Result<(), ValidationError> {
        self.check_response(payload)
            .inspect(|_| debug!(adapter = PROVIDER_NAME, "Response payload accepted"))
            .inspect_err(|err| {
                warn!(adapter = PROVIDER_NAME, error = %err, "Response payload rejected")
            })
    }

    fn message_from_entry(&self, entry: &Value) -> Result<ChatMessage, ValidationError> {
        entry_to_message(entry, ValidationError::Submission)
    }

    fn system_from_entry(&self, entry: &Value) -> Result<SystemChatMessage, ValidationError> {
        SystemChatMessage::try_from(self.message_from_entry(entry)?)
    }

    fn exchange_from_entries(&self, entries: &[Value]) -> Result<ChatExchange, ValidationError> {
        match entries {
            [prompt, response] => Ok(ChatExchange::new(
                self.message_from_entry(prompt)?,
                self.message_from_entry(response)?,
            )),
            _ => Err(ValidationError::Conversation(format!(
                "an exchange needs a prompt and a response, got {} entries",
                entries.len()
            ))),
        }
    }

    fn exchange_to_entries(&self, exchange: &ChatExchange) -> Vec<Value> {
        vec![exchange.prompt.to_wire(false), exchange.response.to_wire(false)]
    }

    fn build_submission(&self, thread: &ConversationThread) -> Value {
        let messages: Vec<Value> = thread
            .messages()
            .iter()
            .map(|message| message.to_wire(false))
            .collect();
        json!({
            "model": self.config.model,
            "messages": messages,
        })
    }

    fn parse_response(&self, payload: &Value) -> Result<ChatMessage, ValidationError> {
        self.validate_response(payload)?;
        entry_to_message(&payload["choices"][0]["message"], ValidationError::Response)
    }

    fn parse_submission(&self, payload: &Value) -> Result<ConversationThread, ValidationError> {
        self.validate_submission(payload)?;
        let entries = payload["messages"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default();

        let (first, rest) = entries
            .split_first()
            .ok_or_else(|| submission_error("'messages' must not be empty"))?;

        let mut thread = ConversationThread::new(self.system_from_entry(first)?);
        let mut pairs = rest.chunks_exact(2);
        for pair in pairs.by_ref() {
            thread.append(self.exchange_from_entries(pair)?);
        }
        // An unpaired trailing message is the prompt still awaiting a reply.
        if let [prompt] = pairs.remainder() {
            thread.set_next_prompt(self.message_from_entry(prompt)?)?;
        }

        debug!(
            adapter = PROVIDER_NAME,
            exchanges = thread.len(),
            pending_prompt = thread.next_prompt().is_some(),
            "Submission parsed into thread"
        );
        Ok(thread)
    }
}

fn submission_error(reason: &str) -> ValidationError {
    ValidationError::Submission(reason.to_string())
}

fn response_error(reason: &str) -> ValidationError {
    ValidationError::Response(reason.to_string())
}

/// Every shape problem in a `{"role", "content"}` entry.
///
/// Roles must match the lowercase wire spelling exactly.
fn message_problems(entry: &Value) -> Vec<String> {
    let Some(object) = entry.as_object() else {
        return vec!["must be a JSON object".to_string()];
    };

    let mut problems = Vec::new();
    match object.get("role") {
        None => problems.push("missing 'role'".to_string()),
        Some(Value::String(role)) => {
            if let Err(err) = MessageRole::from_wire(role) {
                problems.push(err.to_string());
            }
        }
        Some(_) => problems.push("'role' must be a string".to_string()),
    }
    match object.get("content") {
        None => problems.push("missing 'content'".to_string()),
        Some(Value::String(_)) => {}
        Some(_) => problems.push("'content' must be a string".to_string()),
    }
    problems
}

/// Check one `{"role", "content"}` entry and convert it to a message with a
/// fresh id.
fn entry_to_message(
    entry: &Value,
    error: fn(String) -> ValidationError,
) -> Result<ChatMessage, ValidationError> {
    let problems = message_problems(entry);
    if !problems.is_empty() {
        return Err(error(problems.join("; ")));
    }
    let role = entry
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| error("missing 'role'".to_string()))?;
    let content = entry
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| error("missing 'content'".to_string()))?;
    Ok(ChatMessage::new(MessageRole::from_wire(role)?, content))
}
