use thiserror::Error;

use crate::message::MessageRole;

/// Errors raised while constructing, parsing, or validating conversation data.
///
/// Every fallible operation in the workspace returns this type, from thread
/// deserialization down to provider payload checks in the adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("message id must not be empty")]
    EmptyId,

    #[error("message not found: '{0}'")]
    MessageNotFound(String),

    #[error("invalid message role: '{0}'")]
    InvalidRole(String),

    #[error("expected role '{expected}', got '{actual}'")]
    RoleMismatch {
        expected: MessageRole,
        actual: MessageRole,
    },

    #[error("invalid submission payload: {0}")]
    Submission(String),

    #[error("invalid response payload: {0}")]
    Response(String),

    #[error("invalid conversation: {0}")]
    Conversation(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::MalformedJson(err.to_string())
    }
}
