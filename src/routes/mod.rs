// src/routes/mod.rs
pub mod chat;

use crate::{message::ChatResponse, state::SharedState};
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.allowed_origins.clone()))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn origin_guard(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    // Requests without an Origin header are not cross-origin and pass through.
    match req.headers().get(header::ORIGIN) {
        Some(origin) if !state.origin_allowed(origin) => {
            warn!(?origin, "Rejected request from disallowed origin");
            (
                StatusCode::FORBIDDEN,
                Json(ChatResponse::Error("Origin not allowed".to_string())),
            )
                .into_response()
        }
        _ => next.run(req).await,
    }
}
