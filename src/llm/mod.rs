//! Language model access

pub mod dermatologist;
mod openai;
mod repair;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use openai::OpenAiClient;
pub use repair::{parse_json_object, strip_code_fences, RepairOutcome};
pub use types::{ChatMessage, ContentPart, ImageUrl, MessageContent, Role};

/// Sends a chat conversation and returns the assistant's raw text
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String>;
}
