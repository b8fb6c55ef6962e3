//! Conversation data model for chatassist.
//!
//! Messages compose into exchanges, exchanges into threads, and every level
//! round-trips through JSON. Validation failures surface as
//! [`error::ValidationError`].
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror, tracing.

pub mod chat;
pub mod error;
pub mod message;
pub mod messages;

pub use chat::{ChatExchange, ConversationThread};
pub use error::ValidationError;
pub use message::{ChatMessage, MessageId, MessageRole, SystemChatMessage};
pub use messages::ChatMessages;
