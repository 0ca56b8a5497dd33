//! Canned `/api` endpoints for standalone mode. Nothing here touches state.

use axum::{Json, Router, response::IntoResponse, routing::{get, post}};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    adapters::http::extract::AppJson,
    app_error::{AppError, AppResult},
};

pub const DEMO_EMAIL: &str = "demo@outreach.dev";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_TOKEN: &str = "demo-token";

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan {
    id: &'static str,
    name: &'static str,
    monthly_price_usd: Option<u32>,
    features: &'static [&'static str],
}

const PLANS: [Plan; 3] = [
    Plan {
        id: "starter",
        name: "Starter",
        monthly_price_usd: Some(49),
        features: &["500 contacts", "1 active campaign", "Email support"],
    },
    Plan {
        id: "growth",
        name: "Growth",
        monthly_price_usd: Some(149),
        features: &[
            "5,000 contacts",
            "Unlimited campaigns",
            "AI-personalized sequences",
            "CRM sync",
        ],
    },
    Plan {
        id: "enterprise",
        name: "Enterprise",
        monthly_price_usd: None,
        features: &["Unlimited contacts", "Dedicated success manager", "SSO"],
    },
];

pub fn router() -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/auth/login", post(login))
        .route("/pricing", get(pricing))
}

async fn info() -> impl IntoResponse {
    Json(json!({
        "name": "Outreach",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-assisted sales outreach, running in standalone demo mode",
        "features": crate::use_cases::demo::DEMO_FEATURES,
    }))
}

async fn login(AppJson(payload): AppJson<LoginPayload>) -> AppResult<impl IntoResponse> {
    if payload.email != DEMO_EMAIL || payload.password != DEMO_PASSWORD {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(json!({
        "message": "Login successful",
        "user": {
            "id": "demo-user",
            "email": DEMO_EMAIL,
            "firstName": "Demo",
            "lastName": "User",
            "company": "Outreach Demo",
        },
        "token": DEMO_TOKEN,
    })))
}

async fn pricing() -> impl IntoResponse {
    Json(json!({ "plans": PLANS }))
}
