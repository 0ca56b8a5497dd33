use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::http::HeaderValue;
use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    adapters::{
        http::app_state::AppState,
        memory::{InMemoryStore, InMemoryWaitlistRepo},
    },
    application::jwt,
    domain::entities::user::UserProfileFields,
    infra::{
        config::{AppConfig, ServerMode},
        rate_limit::{InMemoryRateLimiter, RateLimiterTrait},
    },
    use_cases::{
        auth::{AuthUseCases, RegisterInput},
        campaign::CampaignUseCases,
        contact::ContactUseCases,
        waitlist::WaitlistUseCases,
    },
};

pub const TEST_PASSWORD: &str = "p1";

/// Builds an `AppState` backed entirely by in-memory adapters.
pub struct TestAppStateBuilder {
    rate_limit: Option<(u64, u64)>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self { rate_limit: None }
    }

    /// Enforce a real window instead of the permissive default.
    pub fn with_rate_limit(mut self, window_secs: u64, max_requests: u64) -> Self {
        self.rate_limit = Some((window_secs, max_requests));
        self
    }

    pub fn build(self) -> AppState {
        let config = test_config(self.rate_limit);

        let rate_limiter: Arc<dyn RateLimiterTrait> = match self.rate_limit {
            Some((window_secs, max_requests)) => {
                Arc::new(InMemoryRateLimiter::new(window_secs, max_requests))
            }
            None => Arc::new(InMemoryRateLimiter::permissive()),
        };

        let store = Arc::new(InMemoryStore::new());

        AppState {
            config: Arc::new(config),
            auth_use_cases: Arc::new(AuthUseCases::new(store.clone())),
            contact_use_cases: Arc::new(ContactUseCases::new(store.clone())),
            campaign_use_cases: Arc::new(CampaignUseCases::new(store)),
            waitlist_use_cases: Arc::new(WaitlistUseCases::new(Arc::new(
                InMemoryWaitlistRepo::new(),
            ))),
            rate_limiter,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config(rate_limit: Option<(u64, u64)>) -> AppConfig {
    let (rate_limit_window_secs, rate_limit_max_requests) = rate_limit.unwrap_or((900, 100));
    AppConfig {
        mode: ServerMode::Full,
        bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        jwt_secret: SecretString::new("test-secret".into()),
        jwt_ttl: None,
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        rate_limit_window_secs,
        rate_limit_max_requests,
        trust_proxy: false,
        database_url: None,
        redis_url: None,
        log_file: None,
    }
}

/// Registers `email` with `TEST_PASSWORD` and returns its id and a bearer token.
pub async fn register_test_user(app_state: &AppState, email: &str) -> (Uuid, String) {
    let user = app_state
        .auth_use_cases
        .register(RegisterInput {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            profile: UserProfileFields::default(),
        })
        .await
        .expect("register test user");
    let token = jwt::issue(user.id, &app_state.config.jwt_secret, None).expect("issue token");
    (user.id, token)
}
