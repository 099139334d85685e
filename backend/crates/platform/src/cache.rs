//! Object Cache Infrastructure
//!
//! Byte-level key/value cache with a fixed time-to-live, fronting expensive
//! reads. Two backends:
//! - [`RedisObjectCache`] - shared across processes (`SET key value EX ttl`)
//! - [`MemoryObjectCache`] - in-process, moka-backed
//!
//! The cache is never authoritative. Callers treat every error as a miss.

use std::time::Duration;

use moka::sync::Cache;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Cache backend failure
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Fixed time-to-live for every entry
    pub ttl: Duration,
    /// Key namespace (Redis only)
    pub namespace: String,
    /// Entry bound for the in-process backend
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5),
            namespace: "feed:".to_string(),
            max_entries: 1_000,
        }
    }
}

/// Object cache trait
#[trait_variant::make(ObjectCache: Send)]
pub trait LocalObjectCache {
    /// Raw bytes stored under `key`, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key` for the configured TTL, overwriting
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
}

// ============================================================================
// Redis backend
// ============================================================================

/// Redis-backed cache sharing one multiplexed connection
#[derive(Clone)]
pub struct RedisObjectCache {
    conn: ConnectionManager,
    ttl_secs: u64,
    namespace: String,
}

impl RedisObjectCache {
    pub async fn connect(redis_url: &str, config: &CacheConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;

        Ok(Self {
            conn,
            // EX 0 is rejected by Redis
            ttl_secs: config.ttl.as_secs().max(1),
            namespace: config.namespace.clone(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }
}

impl ObjectCache for RedisObjectCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(self.namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.namespaced(key), value, self.ttl_secs)
            .await?;
        Ok(())
    }
}

// ============================================================================
// In-process backend
// ============================================================================

/// In-process cache, used when no Redis URL is configured and in tests
#[derive(Clone)]
pub struct MemoryObjectCache {
    entries: Cache<String, Vec<u8>>,
}

impl MemoryObjectCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(config.ttl)
                .build(),
        }
    }
}

impl ObjectCache for MemoryObjectCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// Runtime-selected backend
// ============================================================================

/// Backend chosen at startup from configuration
#[derive(Clone)]
pub enum AnyObjectCache {
    Redis(RedisObjectCache),
    Memory(MemoryObjectCache),
}

impl AnyObjectCache {
    /// Connect to Redis when a URL is given, otherwise fall back to memory
    pub async fn from_url(redis_url: Option<&str>, config: &CacheConfig) -> Result<Self, CacheError> {
        match redis_url {
            Some(url) => {
                let cache = RedisObjectCache::connect(url, config).await?;
                tracing::info!(ttl_secs = cache.ttl_secs, "Using Redis object cache");
                Ok(Self::Redis(cache))
            }
            None => {
                tracing::info!(
                    ttl_secs = config.ttl.as_secs(),
                    "REDIS_URL not set, using in-process object cache"
                );
                Ok(Self::Memory(MemoryObjectCache::new(config)))
            }
        }
    }
}

impl ObjectCache for AnyObjectCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self {
            Self::Redis(cache) => ObjectCache::get(cache, key).await,
            Self::Memory(cache) => ObjectCache::get(cache, key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        match self {
            Self::Redis(cache) => ObjectCache::set(cache, key, value).await,
            Self::Memory(cache) => ObjectCache::set(cache, key, value).await,
        }
    }
}
