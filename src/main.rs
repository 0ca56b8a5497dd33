use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::{info, warn};

use outreach_api::infra::{
    config::AppConfig,
    error::InfraError,
    setup::{init_app, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_file.as_deref())?;

    if config.uses_default_jwt_secret() {
        warn!("JWT_SECRET not set; signing tokens with the built-in demo secret");
    }

    let bind_addr = config.bind_addr;
    let mode = config.mode;

    let app = init_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!(%mode, "Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(InfraError::Server)?;

    Ok(())
}
