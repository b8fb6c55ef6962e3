//! Provider adapters for chatassist.
//!
//! This crate defines the [`adapter::ChatAdapter`] contract that transport
//! code relies on, plus the OpenAI implementation. It depends only on
//! `chatassist-types` -- never on an HTTP client.

pub mod adapter;

pub use adapter::ChatAdapter;
pub use adapter::openai::{OpenAiAdapter, OpenAiAdapterConfig};
