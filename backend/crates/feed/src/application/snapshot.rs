//! Snapshot Cache
//!
//! Typed layer over [`ObjectCache`]. Values are stored as a self-describing
//! JSON envelope:
//!
//! ```json
//! { "version": 1, "payload": ... }
//! ```
//!
//! Any failure on read (backend error, missing key, undecodable bytes,
//! unknown version) is a miss. Failures on write are logged and dropped.

use platform::cache::ObjectCache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Envelope version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    payload: serde_json::Value,
}

#[derive(Clone)]
pub struct SnapshotCache<C> {
    cache: C,
}

impl<C> SnapshotCache<C>
where
    C: ObjectCache + Sync,
{
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Cached value under `key`, or `None` on any kind of miss
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %key, "Snapshot cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Snapshot cache read failed");
                return None;
            }
        };

        let envelope: Envelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Undecodable snapshot");
                return None;
            }
        };

        if envelope.version != SNAPSHOT_VERSION {
            tracing::debug!(key = %key, version = envelope.version, "Snapshot version mismatch");
            return None;
        }

        match serde_json::from_value(envelope.payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Snapshot payload does not match type");
                None
            }
        }
    }

    /// Store `value` under `key` for the backend's TTL
    pub async fn put<T>(&self, key: &str, value: &T)
    where
        T: Serialize + Sync,
    {
        let envelope = EnvelopeRef {
            version: SNAPSHOT_VERSION,
            payload: value,
        };

        let bytes = match serde_json::to_vec(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode snapshot");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, bytes).await {
            tracing::warn!(key = %key, error = %e, "Snapshot cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::cache::{CacheConfig, MemoryObjectCache};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: i64,
        name: String,
    }

    fn snapshots() -> (SnapshotCache<MemoryObjectCache>, MemoryObjectCache) {
        let backend = MemoryObjectCache::new(&CacheConfig::default());
        (SnapshotCache::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (cache, _) = snapshots();
        let items = vec![Item { id: 1, name: "a".into() }];

        cache.put("k", &items).await;
        assert_eq!(cache.get::<Vec<Item>>("k").await, Some(items));
    }

    #[tokio::test]
    async fn test_missing_key_is_miss() {
        let (cache, _) = snapshots();
        assert_eq!(cache.get::<Vec<Item>>("absent").await, None);
    }

    #[tokio::test]
    async fn test_garbage_is_miss() {
        let (cache, backend) = snapshots();
        backend.set("k", b"\x00\x01not json".to_vec()).await.unwrap();
        assert_eq!(cache.get::<Vec<Item>>("k").await, None);
    }

    #[tokio::test]
    async fn test_unknown_version_is_miss() {
        let (cache, backend) = snapshots();
        let raw = br#"{"version":2,"payload":[{"id":1,"name":"a"}]}"#;
        backend.set("k", raw.to_vec()).await.unwrap();
        assert_eq!(cache.get::<Vec<Item>>("k").await, None);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_miss() {
        let (cache, _) = snapshots();
        cache.put("k", &"just a string").await;
        assert_eq!(cache.get::<Vec<Item>>("k").await, None);
    }

    #[tokio::test]
    async fn test_envelope_layout() {
        let (cache, backend) = snapshots();
        cache.put("k", &vec![1, 2, 3]).await;

        let raw = backend.get("k").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["payload"], serde_json::json!([1, 2, 3]));
    }
}
