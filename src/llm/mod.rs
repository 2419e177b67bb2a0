//! Chat-completions client used for pathway discovery.
//!
//! [`CompletionProvider`] is the seam the discovery tool depends on;
//! [`LlmClient`] implements it over HTTP.

mod client;
mod types;


pub use client::LlmClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::LlmResult;

/// Opaque text-generation service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the completion text for a conversation.
    async fn complete(&self, messages: Vec<Message>) -> LlmResult<String>;
}
