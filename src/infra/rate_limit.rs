use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use redis::{Script, aio::ConnectionManager};

use super::error::InfraError;
use crate::app_error::{AppError, AppResult};

/// Trait for rate limiting implementations.
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count one request for `client` (an IP address).
    /// Returns Ok(()) if within limits, Err(AppError::RateLimited) if exceeded.
    async fn check(&self, client: &str) -> AppResult<()>;
}

/// Lua script for atomic increment with TTL.
/// Returns the new count after increment.
/// If the key doesn't exist, it's created with TTL.
/// If the key exists but has no TTL, TTL is set.
const INCR_WITH_TTL_SCRIPT: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
elseif redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return current
"#;

/// Redis-backed fixed-window limiter, shared across processes.
#[derive(Clone)]
pub struct RedisRateLimiter {
    manager: ConnectionManager,
    window_secs: u64,
    max_requests: u64,
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(
        redis_url: &str,
        window_secs: u64,
        max_requests: u64,
    ) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;
        Ok(Self {
            manager,
            window_secs,
            max_requests,
            script: Script::new(INCR_WITH_TTL_SCRIPT),
        })
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(&self, client: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let current: u64 = self
            .script
            .key(format!("rate:api:{client}"))
            .arg(self.window_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if current > self.max_requests {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

struct Window {
    started: Instant,
    count: u64,
}

/// Process-local fixed-window limiter.
pub struct InMemoryRateLimiter {
    window: Duration,
    max_requests: u64,
    windows: Mutex<HashMap<String, Window>>,
}

/// Expired windows are swept once the map grows past this many clients.
const SWEEP_THRESHOLD: usize = 10_000;

impl InMemoryRateLimiter {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Never rejects; for tests that don't exercise limiting.
    pub fn permissive() -> Self {
        Self::new(60, u64::MAX)
    }

    fn check_at(&self, client: &str, now: Instant) -> AppResult<()> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::Internal("rate limiter lock poisoned".into()))?;

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        if entry.count > self.max_requests {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, client: &str) -> AppResult<()> {
        self.check_at(client, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_after_cap_within_window() {
        let limiter = InMemoryRateLimiter::new(900, 3);
        let now = Instant::now();

        for _ in 0..3 {
            limiter.check_at("10.0.0.1", now).unwrap();
        }
        assert!(matches!(
            limiter.check_at("10.0.0.1", now),
            Err(AppError::RateLimited)
        ));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = InMemoryRateLimiter::new(900, 1);
        let now = Instant::now();

        limiter.check_at("10.0.0.1", now).unwrap();
        limiter.check_at("10.0.0.2", now).unwrap();
        assert!(limiter.check_at("10.0.0.1", now).is_err());
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = InMemoryRateLimiter::new(900, 1);
        let start = Instant::now();

        limiter.check_at("10.0.0.1", start).unwrap();
        assert!(limiter.check_at("10.0.0.1", start).is_err());

        let later = start + Duration::from_secs(900);
        limiter.check_at("10.0.0.1", later).unwrap();
    }

    #[tokio::test]
    async fn permissive_never_rejects() {
        let limiter = InMemoryRateLimiter::permissive();
        for _ in 0..1_000 {
            limiter.check("10.0.0.1").await.unwrap();
        }
    }
}
