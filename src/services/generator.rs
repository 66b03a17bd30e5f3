use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Network(String),

    /// Non-success reply, rendered like the SDK does: `"<code> <message>"`.
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
