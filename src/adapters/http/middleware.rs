use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{Extensions, HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState, app_error::AppError, application::jwt,
    infra::rate_limit::RateLimiterTrait,
};

/// State for `rate_limit_middleware`; shared by both server modes.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiterTrait>,
    pub trust_proxy: bool,
}

pub async fn rate_limit_middleware(
    State(limits): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(request.headers(), request.extensions(), limits.trust_proxy)
        .unwrap_or_else(|| "unknown".to_string());

    tracing::debug!(trust_proxy = limits.trust_proxy, using_ip = %ip, "Rate limiting request");

    limits.limiter.check(&ip).await?;

    Ok(next.run(request).await)
}

/// The authenticated caller, inserted by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Resolves `Authorization: Bearer <token>` to a live user or rejects with 401.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(jwt::bearer_token)
        .ok_or(AppError::Unauthenticated)?;

    let claims = jwt::verify(token, &app_state.config.jwt_secret)?;
    let user = app_state.auth_use_cases.resolve(claims.user_id()?).await?;

    request.extensions_mut().insert(CurrentUser { id: user.id });

    Ok(next.run(request).await)
}

/// Client details recorded alongside waitlist signups.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(ClientInfo {
            ip_address: client_ip(&parts.headers, &parts.extensions, state.config.trust_proxy),
            user_agent,
        })
    }
}

/// Socket peer address, or the forwarded client address when behind a trusted proxy.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions, trust_proxy: bool) -> Option<String> {
    // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
    if trust_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip);
    }
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    // Extract IP from X-Forwarded-For or X-Real-IP headers
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let trimmed = first.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(real) = headers.get("x-real-ip")
        && let Ok(val) = real.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }
    None
}
