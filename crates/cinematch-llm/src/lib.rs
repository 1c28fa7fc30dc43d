//! LLM provider abstraction: text embeddings and chat completions.

pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod openai;
pub mod provider;

pub use error::LlmError;
pub use provider::{LlmProvider, Message, Role};
