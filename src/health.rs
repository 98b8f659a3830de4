use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Router};

/// Liveness routes served next to the webhook.
pub fn router(started: Instant) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(started)
}

async fn root() -> &'static str {
    "quizbot is running"
}

async fn health(State(started): State<Instant>) -> (StatusCode, String) {
    let uptime = started.elapsed().as_secs();
    (StatusCode::OK, format!("ok, uptime {uptime}s"))
}
