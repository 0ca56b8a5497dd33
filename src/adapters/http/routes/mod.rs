pub mod auth;
pub mod campaigns;
pub mod contacts;
pub mod demo;
pub mod health;
pub mod standalone;
pub mod waitlist;

use axum::{Router, middleware};

use crate::{
    adapters::http::{app_state::AppState, middleware::require_auth},
    app_error::AppError,
};

/// Full-mode `/api` routes. Contacts and campaigns require a bearer token.
pub fn router(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(contacts::router())
        .merge(campaigns::router())
        .route_layer(middleware::from_fn_with_state(app_state, require_auth));

    Router::new()
        .nest("/auth", auth::router())
        .merge(demo::router())
        .merge(waitlist::router())
        .merge(protected)
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
