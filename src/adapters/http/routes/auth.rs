use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, extract::AppJson},
    app_error::AppResult,
    application::jwt,
    domain::entities::user::{PublicUser, UserProfileFields},
    use_cases::auth::RegisterInput,
};

// Fields default to empty so a missing value is reported as a 400 by validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct AuthResponse {
    message: &'static str,
    user: PublicUser,
    token: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .register(RegisterInput {
            email: payload.email,
            password: payload.password,
            profile: UserProfileFields {
                first_name: payload.first_name,
                last_name: payload.last_name,
                company: payload.company,
            },
        })
        .await?;

    let token = jwt::issue(user.id, &app_state.config.jwt_secret, app_state.config.jwt_ttl)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
            token,
        }),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    let token = jwt::issue(user.id, &app_state.config.jwt_secret, app_state.config.jwt_ttl)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
        token,
    }))
}
