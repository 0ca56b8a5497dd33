use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    adapters::http::app_state::AppState, app_error::AppResult, use_cases::demo::collect_stats,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/demo/stats", get(stats))
}

async fn stats(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = collect_stats(
        &app_state.auth_use_cases,
        &app_state.contact_use_cases,
        &app_state.campaign_use_cases,
        &app_state.waitlist_use_cases,
    )
    .await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::test_utils::{TestAppStateBuilder, register_test_user};

    #[tokio::test]
    async fn stats_are_public_and_reflect_collections() {
        let app_state = TestAppStateBuilder::new().build();
        register_test_user(&app_state, "a@x.com").await;
        register_test_user(&app_state, "b@x.com").await;
        let server = TestServer::new(router().with_state(app_state)).unwrap();

        let response = server.get("/demo/stats").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["stats"]["users"], 2);
        assert_eq!(body["stats"]["contacts"], 0);
        assert_eq!(body["stats"]["campaigns"], 0);
        assert!(!body["features"].as_array().unwrap().is_empty());
    }
}
