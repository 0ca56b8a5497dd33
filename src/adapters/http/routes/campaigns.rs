use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;

use super::contacts::object_body;
use crate::{
    adapters::http::{app_state::AppState, extract::AppJson, middleware::CurrentUser},
    app_error::AppResult,
    domain::entities::campaign::Campaign,
};

#[derive(Serialize)]
struct CampaignsResponse {
    campaigns: Vec<Campaign>,
    total: usize,
}

/// Expects `require_auth` to be layered on by the parent router.
pub fn router() -> Router<AppState> {
    Router::new().route("/campaigns", get(list_campaigns).post(create_campaign))
}

async fn list_campaigns(
    State(app_state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let campaigns = app_state.campaign_use_cases.list(user.id).await?;
    Ok(Json(CampaignsResponse {
        total: campaigns.len(),
        campaigns,
    }))
}

async fn create_campaign(
    State(app_state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(body): AppJson<Value>,
) -> AppResult<impl IntoResponse> {
    let campaign = app_state
        .campaign_use_cases
        .create(user.id, object_body(body)?)
        .await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}
