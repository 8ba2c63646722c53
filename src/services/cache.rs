use crate::config::CacheSettings;
use crate::models::Coordinate;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Redis timed out: {0}")]
    Timeout(String),
}

/// Best-effort key-value store with per-entry expiry.
///
/// Implementations never fail the caller: a backend error reads as a miss
/// and a failed write is dropped. Safe for concurrent use; the last writer
/// of a key wins.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64);

    /// `false` when running in degraded mode
    fn is_available(&self) -> bool {
        true
    }
}

/// Read and deserialize a JSON value
pub async fn get_json<T>(cache: &dyn KeyValueCache, key: &str) -> Result<Option<T>, CacheError>
where
    T: DeserializeOwned,
{
    match cache.get(key).await {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value
pub async fn set_json<T>(
    cache: &dyn KeyValueCache,
    key: &str,
    value: &T,
    ttl_secs: u64,
) -> Result<(), CacheError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    cache.set_with_expiry(key, &json, ttl_secs).await;
    Ok(())
}

#[derive(Clone)]
struct Entry {
    value: Arc<str>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache tier
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }

    async fn insert(&self, key: &str, value: &str, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = Entry {
            value: Arc::from(value),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await.map(|entry| entry.value.to_string())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) {
        self.insert(key, value, Duration::from_secs(ttl_secs)).await;
    }
}

/// Run a Redis call, giving up after `timeout`
async fn bounded<T, F>(
    timeout: Duration,
    operation: impl FnOnce() -> String,
    call: F,
) -> Result<T, CacheError>
where
    F: std::future::Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(CacheError::Timeout(operation())),
    }
}

/// Redis connection shared across workers.
///
/// Every call is bounded by the connection timeout.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    /// Connect and probe with `PING`
    pub async fn connect(redis_url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let mut conn = bounded(
            timeout,
            || format!("connect to {}", redis_url),
            ConnectionManager::new(client),
        )
        .await?;

        let _: String = bounded(
            timeout,
            || format!("PING {}", redis_url),
            redis::cmd("PING").query_async(&mut conn),
        )
        .await?;

        Ok(Self { conn, timeout })
    }

    /// Value plus its remaining lifetime, if any
    async fn fetch(&self, key: &str) -> Result<Option<(String, Option<Duration>)>, CacheError> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        let query = pipe
            .cmd("GET")
            .arg(key)
            .cmd("PTTL")
            .arg(key)
            .query_async(&mut conn);
        let (value, pttl_ms): (Option<String>, i64) =
            bounded(self.timeout, || format!("GET {}", key), query).await?;

        let remaining = u64::try_from(pttl_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        Ok(value.map(|v| (v, remaining)))
    }

    async fn store(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SETEX");
        cmd.arg(key).arg(ttl_secs).arg(value);
        bounded(self.timeout, || format!("SETEX {}", key), cmd.query_async(&mut conn)).await
    }
}

/// Multi-tier cache manager
///
/// Implements L1 (in-memory) and L2 (Redis) caching strategy.
/// L1 is fastest but local to the process, L2 is shared across instances.
pub struct CacheManager {
    redis: RedisStore,
    l1_cache: Option<MemoryCache>,
}

impl CacheManager {
    /// Create a new cache manager. An `l1_size` of 0 disables the L1 tier.
    pub async fn new(redis_url: &str, l1_size: u64, timeout: Duration) -> Result<Self, CacheError> {
        let redis = RedisStore::connect(redis_url, timeout).await?;
        let l1_cache = (l1_size > 0).then(|| MemoryCache::new(l1_size));
        Ok(Self { redis, l1_cache })
    }
}

#[async_trait]
impl KeyValueCache for CacheManager {
    async fn get(&self, key: &str) -> Option<String> {
        if let Some(l1) = &self.l1_cache {
            if let Some(value) = l1.get(key).await {
                tracing::trace!("L1 cache hit: {}", key);
                return Some(value);
            }
        }

        match self.redis.fetch(key).await {
            Ok(Some((value, remaining))) => {
                tracing::trace!("L2 cache hit: {}", key);
                // Populate L1 for no longer than Redis will keep the entry
                if let (Some(l1), Some(remaining)) = (&self.l1_cache, remaining) {
                    l1.insert(key, &value, remaining).await;
                }
                Some(value)
            }
            Ok(None) => {
                tracing::trace!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) {
        if ttl_secs == 0 {
            return;
        }
        if let Some(l1) = &self.l1_cache {
            l1.insert(key, value, Duration::from_secs(ttl_secs)).await;
        }
        match self.redis.store(key, value, ttl_secs).await {
            Ok(()) => tracing::trace!("Cache set: {} (ttl {}s)", key, ttl_secs),
            Err(e) => tracing::warn!("Cache write failed for {}: {}", key, e),
        }
    }
}

/// Degraded mode: nothing is ever stored
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl KeyValueCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl_secs: u64) {}

    fn is_available(&self) -> bool {
        false
    }
}

/// Select the cache for the process lifetime.
///
/// Any connection failure degrades to [`NoopCache`]; it is logged here once
/// and never surfaced to requests.
pub async fn connect_or_degrade(settings: &CacheSettings) -> Arc<dyn KeyValueCache> {
    if !settings.enabled {
        tracing::info!("Caching disabled by configuration");
        return Arc::new(NoopCache);
    }

    let redis_url = settings.redis_url();
    match CacheManager::new(&redis_url, settings.l1_cache_size, settings.connection_timeout()).await {
        Ok(cache) => {
            tracing::info!(
                "Cache manager initialized ({}:{}, L1: {} entries)",
                settings.redis_host,
                settings.redis_port,
                settings.l1_cache_size
            );
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis at {}:{} ({}), running without cache",
                settings.redis_host,
                settings.redis_port,
                e
            );
            Arc::new(NoopCache)
        }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a route between two points.
    ///
    /// Coordinates use their shortest round-trip decimal form, so `40.0`
    /// and `40` share a key.
    pub fn route(origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "route:{},{}:{},{}",
            origin.lat, origin.lng, destination.lat, destination.lng
        )
    }
}
