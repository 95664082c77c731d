//! Content-addressed result cache with a short TTL.
//!
//! `ResultCache` degrades gracefully around the opaque store: a read failure
//! is a miss, a write failure is a no-op — never fatal to the main flow. A
//! hit short-circuits the entire agent pipeline for that turn.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insight_core::{AgentResponse, CacheStore, CachedEntry, Fingerprint};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct ResultCache {
    store: std::sync::Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: std::sync::Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up a cached response. Returns `None` on miss, on expiry, and on
    /// store error (logged, not surfaced).
    pub async fn get(&self, feedback_id: &str, fingerprint: &Fingerprint) -> Option<CachedEntry> {
        match self.store.get(feedback_id, fingerprint.as_str()).await {
            Ok(Some(entry)) if entry.expires_at > Utc::now() => Some(entry),
            Ok(Some(_)) => {
                tracing::debug!(feedback_id, cache_key = %fingerprint, "cache entry expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(feedback_id, "cache read failed, treating as miss: {e:#}");
                None
            }
        }
    }

    /// Upsert a response. Best-effort: on store error the caller proceeds
    /// without caching and without a write timestamp.
    pub async fn put(
        &self,
        feedback_id: &str,
        fingerprint: &Fingerprint,
        payload: &AgentResponse,
    ) -> Option<DateTime<Utc>> {
        match self
            .store
            .put(feedback_id, fingerprint.as_str(), payload, self.ttl)
            .await
        {
            Ok(written_at) => Some(written_at),
            Err(e) => {
                tracing::error!(feedback_id, "cache write failed, continuing uncached: {e:#}");
                None
            }
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory `CacheStore` for local runs and tests. Expired entries are kept
/// until overwritten — expiry is enforced on read, like a TTL'd durable
/// store that deletes lazily.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), CachedEntry>>,
}

impl MemoryStore {
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(
        &self,
        feedback_id: &str,
        cache_key: &str,
    ) -> anyhow::Result<Option<CachedEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(feedback_id.to_string(), cache_key.to_string()))
            .cloned())
    }

    async fn put(
        &self,
        feedback_id: &str,
        cache_key: &str,
        payload: &AgentResponse,
        ttl: Duration,
    ) -> anyhow::Result<DateTime<Utc>> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(60));
        let entry = CachedEntry {
            payload: payload.clone(),
            last_updated: now,
            expires_at: now + ttl,
        };
        self.entries
            .write()
            .await
            .insert((feedback_id.to_string(), cache_key.to_string()), entry);
        Ok(now)
    }
}
