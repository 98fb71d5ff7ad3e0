use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::events::{DomainEvent, EventBus};

/// Redis-backed read cache. Values are stored as JSON strings; every key
/// has either an explicit TTL or an invalidator subscription, never neither.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

fn json_error(context: &'static str, e: serde_json::Error) -> RedisError {
    RedisError::from((redis::ErrorKind::TypeError, context, e.to_string()))
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        raw.map(|v| serde_json::from_str(&v).map_err(|e| json_error("deserialize", e)))
            .transpose()
    }

    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| json_error("serialize", e))?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(serialized);
        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }
        cmd.query_async(&mut self.connection.clone()).await
    }

    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }
}

/// Cache key generators
pub mod keys {
    /// Key for the open-requests browse list
    pub fn request_list() -> String {
        "requests:list".to_string()
    }

    /// Key for a single request with its quotes and photos
    pub fn request(id: &str) -> String {
        format!("request:{id}")
    }

    /// Key for a user's active-jobs view
    pub fn active_jobs(user_id: &str) -> String {
        format!("user:{user_id}:active-jobs")
    }

    /// Key for a user profile
    pub fn profile(id: &str) -> String {
        format!("profile:{id}")
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub request_list_ttl: Duration,
    pub request_ttl: Duration,
    pub profile_ttl: Duration,
    pub active_jobs_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            request_list_ttl: Duration::from_secs(60),
            request_ttl: Duration::from_secs(300),
            profile_ttl: Duration::from_secs(900),
            active_jobs_ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            request_list_ttl: parse_duration_secs("CACHE_TTL_REQUEST_LIST", 60),
            request_ttl: parse_duration_secs("CACHE_TTL_REQUEST_DETAIL", 300),
            profile_ttl: parse_duration_secs("CACHE_TTL_PROFILES", 900),
            active_jobs_ttl: parse_duration_secs("CACHE_TTL_ACTIVE_JOBS", 60),
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

/// Subscribe the cache to the domain-event bus: any change to an entity
/// drops the keys derived from it. Runs until the bus is closed.
pub fn spawn_invalidator(bus: &EventBus, cache: Arc<RedisCache>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    // Dropping the whole list key on lag would need pattern
                    // deletes; a short TTL covers the skipped events instead.
                    warn!(skipped, "cache invalidator lagged behind the event bus");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };

            let result = match event {
                DomainEvent::RequestChanged { request_id } => {
                    let _ = cache.delete(&keys::request_list()).await;
                    cache.delete(&keys::request(&request_id.to_string())).await
                }
                DomainEvent::QuoteChanged { request_id, .. } => {
                    cache.delete(&keys::request(&request_id.to_string())).await
                }
                DomainEvent::ContractChanged {
                    request_id: Some(request_id),
                    ..
                } => cache.delete(&keys::request(&request_id.to_string())).await,
                // Bookings, booking-origin contracts, and notifications are
                // not cached.
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!("cache invalidation failed: {e}");
            }
        }
    });
}
