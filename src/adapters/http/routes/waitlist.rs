use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, extract::AppJson, middleware::ClientInfo},
    app_error::AppResult,
    domain::entities::waitlist::WaitlistSignup,
    use_cases::waitlist::JoinWaitlist,
};

#[derive(Deserialize)]
struct JoinPayload {
    #[serde(default)]
    email: String,
    source: Option<String>,
    metadata: Option<serde_json::Value>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waitlist", post(join))
        .route("/waitlist/{email}", get(lookup))
}

async fn join(
    State(app_state): State<AppState>,
    client: ClientInfo,
    AppJson(payload): AppJson<JoinPayload>,
) -> AppResult<impl IntoResponse> {
    let entry = app_state
        .waitlist_use_cases
        .join(JoinWaitlist {
            email: payload.email,
            source: payload.source,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
            metadata: payload.metadata,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(WaitlistSignup::from(entry))))
}

async fn lookup(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = app_state.waitlist_use_cases.lookup(&email).await?;
    Ok(Json(WaitlistSignup::from(entry)))
}
