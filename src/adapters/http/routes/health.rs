use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::json;

use crate::infra::config::ServerMode;

/// `GET /health`, outside `/api` so it is never rate limited.
pub fn router<S>(mode: ServerMode) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/health",
        get(move || async move {
            Json(json!({
                "status": "OK",
                "mode": mode.to_string(),
                "timestamp": Utc::now(),
            }))
        }),
    )
}
