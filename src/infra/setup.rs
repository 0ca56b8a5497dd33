use std::{fs::File, sync::Arc};

use anyhow::Context;
use axum::Router;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        http::app_state::AppState,
        memory::{InMemoryStore, InMemoryWaitlistRepo},
    },
    infra::{
        app::{create_app, create_standalone_app},
        config::{AppConfig, ServerMode},
        error::InfraError,
        postgres_persistence,
        rate_limit::{InMemoryRateLimiter, RateLimiterTrait, RedisRateLimiter},
    },
    use_cases::{
        auth::AuthUseCases,
        campaign::CampaignUseCases,
        contact::ContactUseCases,
        waitlist::{WaitlistRepo, WaitlistUseCases},
    },
};

/// Build the router for the configured mode.
pub async fn init_app(config: AppConfig) -> anyhow::Result<Router> {
    match config.mode {
        ServerMode::Full => Ok(create_app(init_app_state(config).await?)),
        ServerMode::Standalone => {
            let rate_limiter = init_rate_limiter(&config).await?;
            Ok(create_standalone_app(&config, rate_limiter))
        }
    }
}

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let rate_limiter = init_rate_limiter(&config).await?;

    // Users, contacts and campaigns live in process memory for the lifetime of the server.
    let store = Arc::new(InMemoryStore::new());

    let waitlist_repo: Arc<dyn WaitlistRepo> = match config.database_url.as_deref() {
        Some(database_url) => Arc::new(postgres_persistence(database_url).await?),
        None => {
            tracing::info!("DATABASE_URL not set; waitlist entries are kept in memory");
            Arc::new(InMemoryWaitlistRepo::new())
        }
    };

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(AuthUseCases::new(store.clone())),
        contact_use_cases: Arc::new(ContactUseCases::new(store.clone())),
        campaign_use_cases: Arc::new(CampaignUseCases::new(store)),
        waitlist_use_cases: Arc::new(WaitlistUseCases::new(waitlist_repo)),
        rate_limiter,
    })
}

pub async fn init_rate_limiter(
    config: &AppConfig,
) -> Result<Arc<dyn RateLimiterTrait>, InfraError> {
    let window_secs = config.rate_limit_window_secs;
    let max_requests = config.rate_limit_max_requests;

    Ok(match config.redis_url.as_deref() {
        Some(redis_url) => {
            Arc::new(RedisRateLimiter::new(redis_url, window_secs, max_requests).await?)
        }
        None => Arc::new(InMemoryRateLimiter::new(window_secs, max_requests)),
    })
}

pub fn init_tracing(log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "outreach_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), only when LOG_FILE is set
    let json_layer = log_file
        .map(|path| {
            File::create(path)
                .with_context(|| format!("cannot create log file {path}"))
                .map(|file| {
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(true)
                        .with_span_list(true)
                })
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
