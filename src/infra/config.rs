use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumString};
use time::Duration;
use url::Url;

/// Used when `JWT_SECRET` is not set. Fine for a demo, never for production.
pub const DEFAULT_JWT_SECRET: &str = "outreach-demo-secret-change-me";

/// Which route set the process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ServerMode {
    /// Token auth, in-memory contacts/campaigns, waitlist.
    Full,
    /// Canned responses only.
    Standalone,
}

pub struct AppConfig {
    pub mode: ServerMode,
    pub bind_addr: SocketAddr,
    pub jwt_secret: SecretString,
    /// `None` issues tokens without an `exp` claim.
    pub jwt_ttl: Option<Duration>,
    pub cors_origin: HeaderValue,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u64,
    /// Whether to trust X-Forwarded-For headers. Set to true when behind a reverse proxy.
    /// SECURITY: Only enable this when the API is not directly exposed to the internet.
    pub trust_proxy: bool,
    /// Postgres for the waitlist; in-memory when unset.
    pub database_url: Option<String>,
    /// Redis for rate-limit counters; in-memory when unset.
    pub redis_url: Option<String>,
    /// Optional path for JSON-formatted logs.
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mode: ServerMode = get_env_default("SERVER_MODE", String::from("full"))
            .parse()
            .context("SERVER_MODE must be `full` or `standalone`")?;

        let port: u16 = get_env_default("PORT", 5000);
        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let jwt_secret: String = get_env_default("JWT_SECRET", DEFAULT_JWT_SECRET.to_string());
        let jwt_ttl = parse_jwt_ttl(optional_env("JWT_TTL_SECS").as_deref())?;

        let frontend_url: Url =
            get_env_default("FRONTEND_URL", String::from("http://localhost:3000"))
                .parse()
                .context("FRONTEND_URL must be a valid URL")?;
        let cors_origin = cors_origin_from(&frontend_url)?;

        let rate_limit_window_secs: u64 = get_env_default("RATE_LIMIT_WINDOW_SECS", 15 * 60);
        let rate_limit_max_requests: u64 = get_env_default("RATE_LIMIT_MAX_REQUESTS", 100);
        // Default to false for security - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);

        Ok(Self {
            mode,
            bind_addr,
            jwt_secret: SecretString::new(jwt_secret.into()),
            jwt_ttl,
            cors_origin,
            rate_limit_window_secs,
            rate_limit_max_requests,
            trust_proxy,
            database_url: optional_env("DATABASE_URL"),
            redis_url: optional_env("REDIS_URL"),
            log_file: optional_env("LOG_FILE"),
        })
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEFAULT_JWT_SECRET
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `None` when unset; otherwise a positive number of seconds.
fn parse_jwt_ttl(raw: Option<&str>) -> anyhow::Result<Option<Duration>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let secs: i64 = raw
        .parse()
        .context("JWT_TTL_SECS must be a number of seconds")?;
    anyhow::ensure!(secs > 0, "JWT_TTL_SECS must be greater than zero");
    Ok(Some(Duration::seconds(secs)))
}

/// Browsers send the origin without a trailing slash or path.
fn cors_origin_from(url: &Url) -> anyhow::Result<HeaderValue> {
    url.origin()
        .ascii_serialization()
        .parse()
        .context("FRONTEND_URL must be a valid header value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn server_mode_parses_lowercase_names() {
        assert_eq!(ServerMode::from_str("full").unwrap(), ServerMode::Full);
        assert_eq!(
            ServerMode::from_str("standalone").unwrap(),
            ServerMode::Standalone
        );
        assert!(ServerMode::from_str("demo").is_err());
        assert_eq!(ServerMode::Standalone.to_string(), "standalone");
    }

    #[test]
    fn jwt_ttl_must_be_positive() {
        assert_eq!(parse_jwt_ttl(None).unwrap(), None);
        assert_eq!(
            parse_jwt_ttl(Some("3600")).unwrap(),
            Some(Duration::hours(1))
        );
        assert!(parse_jwt_ttl(Some("0")).is_err());
        assert!(parse_jwt_ttl(Some("-60")).is_err());
        assert!(parse_jwt_ttl(Some("soon")).is_err());
    }

    #[test]
    fn cors_origin_strips_path_and_trailing_slash() {
        let url = Url::parse("https://app.example.com/landing/").unwrap();
        assert_eq!(cors_origin_from(&url).unwrap(), "https://app.example.com");

        let url = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(cors_origin_from(&url).unwrap(), "http://localhost:3000");
    }
}
