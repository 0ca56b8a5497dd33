use std::sync::Arc;

use axum::{Router, extract::FromRef, http, middleware};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{RateLimitState, rate_limit_middleware},
        routes::{self, health, not_found, standalone},
    },
    infra::{
        config::{AppConfig, ServerMode},
        rate_limit::RateLimiterTrait,
    },
};

/// Full mode: token auth, owner-scoped resources, waitlist and stats.
pub fn create_app(app_state: AppState) -> Router {
    let api = routes::router(app_state.clone()).layer(middleware::from_fn_with_state(
        RateLimitState::from_ref(&app_state),
        rate_limit_middleware,
    ));

    let router = Router::new()
        .merge(health::router(ServerMode::Full))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(app_state.clone());

    with_common_layers(router, &app_state.config)
}

/// Standalone mode: canned responses, no stored state besides rate-limit counters.
pub fn create_standalone_app(config: &AppConfig, limiter: Arc<dyn RateLimiterTrait>) -> Router {
    let limits = RateLimitState {
        limiter,
        trust_proxy: config.trust_proxy,
    };
    let api = standalone::router().layer(middleware::from_fn_with_state(
        limits,
        rate_limit_middleware,
    ));

    let router = Router::new()
        .merge(health::router(ServerMode::Standalone))
        .nest("/api", api)
        .fallback(not_found);

    with_common_layers(router, config)
}

fn with_common_layers(router: Router, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    router
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        infra::rate_limit::InMemoryRateLimiter,
        test_utils::{TestAppStateBuilder, test_config},
    };

    fn full_server(builder: TestAppStateBuilder) -> TestServer {
        TestServer::new(create_app(builder.build())).unwrap()
    }

    fn standalone_server(max_requests: u64) -> TestServer {
        let config = test_config(None);
        let limiter = Arc::new(InMemoryRateLimiter::new(900, max_requests));
        TestServer::new(create_standalone_app(&config, limiter)).unwrap()
    }

    #[tokio::test]
    async fn register_then_list_contacts_starts_empty() {
        let server = full_server(TestAppStateBuilder::new());

        let registered: Value = server
            .post("/api/auth/register")
            .json(&json!({ "email": "a@x.com", "password": "p1" }))
            .await
            .json();
        let token = registered["token"].as_str().unwrap();

        let response = server
            .get("/api/contacts")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "contacts": [], "total": 0 }));
    }

    #[tokio::test]
    async fn health_reports_mode() {
        let body: Value = full_server(TestAppStateBuilder::new())
            .get("/health")
            .await
            .json();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["mode"], "full");

        let body: Value = standalone_server(100).get("/health").await.json();
        assert_eq!(body["mode"], "standalone");
    }

    #[tokio::test]
    async fn unmatched_routes_return_json_404_in_both_modes() {
        for server in [full_server(TestAppStateBuilder::new()), standalone_server(100)] {
            for path in ["/nope", "/api/nope"] {
                let response = server.get(path).await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
            }
        }
    }

    #[tokio::test]
    async fn api_requests_past_the_cap_return_429() {
        let server = full_server(TestAppStateBuilder::new().with_rate_limit(900, 2));

        for _ in 0..2 {
            server.get("/api/demo/stats").await.assert_status_ok();
        }
        let response = server.get("/api/demo/stats").await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.json::<Value>()["code"], "RATE_LIMITED");

        // Health checks sit outside /api.
        server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn standalone_api_is_rate_limited() {
        let server = standalone_server(1);

        server.get("/api/pricing").await.assert_status_ok();
        server
            .get("/api/info")
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn cors_preflight_only_admits_frontend_origin() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let preflight = |origin: &'static str| {
            Request::builder()
                .method(http::Method::OPTIONS)
                .uri("/api/contacts")
                .header("origin", origin)
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "authorization,content-type")
                .body(Body::empty())
                .unwrap()
        };

        let app = create_app(TestAppStateBuilder::new().build());

        let allowed = app
            .clone()
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();
        let headers = allowed.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:3000"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");

        let foreign = app.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(
            foreign
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
    }

    #[tokio::test]
    async fn responses_carry_security_headers() {
        let response = full_server(TestAppStateBuilder::new()).get("/health").await;
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
    }

    #[tokio::test]
    async fn standalone_mode_serves_canned_login() {
        let server = standalone_server(100);

        let body: Value = server
            .post("/api/auth/login")
            .json(&json!({ "email": "demo@outreach.dev", "password": "demo123" }))
            .await
            .json();
        assert_eq!(body["token"], "demo-token");

        // Full-mode routes do not exist here.
        server
            .get("/api/contacts")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
