use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use tracing::error;

use crate::{
    error::RelayError, message::ChatResponse, services::relay::relay_chat, state::SharedState,
};

// Takes raw bytes so malformed JSON is reported through `RelayError`, not axum's rejection.
// Body rejections (e.g. over the default 2 MB limit) get the same JSON error treatment.
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let result = match body {
        Ok(body) => relay_chat(state.generator.as_ref(), &body).await,
        Err(rejection) => Err(RelayError::Unexpected(anyhow::anyhow!(
            rejection.body_text()
        ))),
    };

    let reply = result.inspect_err(|err| {
        if let RelayError::Unexpected(source) = err {
            error!("Server error: {source:?}");
        }
    })?;

    Ok(Json(ChatResponse::Response(reply)))
}
