use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    adapters::http::middleware::RateLimitState,
    infra::{config::AppConfig, rate_limit::RateLimiterTrait},
    use_cases::{
        auth::AuthUseCases, campaign::CampaignUseCases, contact::ContactUseCases,
        waitlist::WaitlistUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub contact_use_cases: Arc<ContactUseCases>,
    pub campaign_use_cases: Arc<CampaignUseCases>,
    pub waitlist_use_cases: Arc<WaitlistUseCases>,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
}

impl FromRef<AppState> for RateLimitState {
    fn from_ref(app_state: &AppState) -> Self {
        RateLimitState {
            limiter: app_state.rate_limiter.clone(),
            trust_proxy: app_state.config.trust_proxy,
        }
    }
}
