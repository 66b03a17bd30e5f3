use anyhow::Context;
use serde_json::Value;
use tracing::{error, info};

use crate::error::RelayError;
use crate::message::ChatRequest;
use crate::services::generator::TextGenerator;

/// Decode a raw `/chat` body, validate it and forward the message to `generator`.
///
/// The generator is only called once the body holds a non-empty string `message`.
pub async fn relay_chat(
    generator: &dyn TextGenerator,
    raw_body: &[u8],
) -> Result<String, RelayError> {
    let payload: Value = serde_json::from_slice(raw_body)
        .context("Failed to decode JSON body")
        .map_err(RelayError::Unexpected)?;
    info!(%payload, "Received chat payload");

    let request = ChatRequest::try_from(payload)?;

    info!(prompt = %request.message, "Sending message to Gemini");
    generator.generate(&request.message).await.map_err(|e| {
        error!(error = %e, "Gemini API error");
        RelayError::Upstream(e)
    })
}
