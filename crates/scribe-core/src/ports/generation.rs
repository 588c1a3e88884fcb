//! Text generation port.

use async_trait::async_trait;

/// Remote text generator - a fallible `prompt -> text` function.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Provider failures. None of these reach API callers.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Provider request failed: {0}")]
    Transport(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response was unusable: {0}")]
    InvalidResponse(String),
}
