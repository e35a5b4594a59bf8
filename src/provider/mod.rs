// src/provider/mod.rs — Reply generator layer

pub mod ollama;

use async_trait::async_trait;

use crate::core::types::ChatTurn;
use crate::infra::errors::TripmateError;

/// Produces the assistant's next message for a conversation.
///
/// `history` is the full context, oldest first. Callers bound its length, so
/// implementations send it as-is.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn id(&self) -> &str;

    async fn complete(&self, history: &[ChatTurn]) -> Result<String, TripmateError>;
}
