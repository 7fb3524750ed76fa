//! Request fingerprints and the rendered-image cache

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

/// Default time-to-live for rendered images
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Fixed-length (SHA-256, hex) fingerprint of a whole request payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Fingerprint the entire payload.
    ///
    /// The payload is re-serialized with object keys sorted, so key order
    /// and insignificant JSON whitespace do not matter. Every value does,
    /// including whitespace inside `code`, and so does every extra field a
    /// client sends.
    pub fn derive(payload: &Value) -> Self {
        let canonical = canonicalize(payload).to_string();
        let digest = Sha256::digest(canonical.as_bytes());
        CacheKey(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    bytes: Bytes,
    expires_at: Instant,
}

/// Time-bounded store of rendered images
///
/// Entries are immutable once inserted and expire after a fixed TTL. There
/// is no capacity bound: memory is limited only by TTL × distinct request
/// rate, so deployments facing many novel requests need an external bound.
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached bytes for `key`, if present and not expired
    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let now = Instant::now();
        let hit = self.entries.get(key).and_then(|entry| {
            if entry.expires_at > now {
                Some(entry.bytes.clone())
            } else {
                None
            }
        });
        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        hit
    }

    /// Store `bytes` under `key`, replacing any previous entry and resetting its TTL
    pub fn insert(&self, key: CacheKey, bytes: Bytes) {
        let entry = CacheEntry {
            bytes,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(key, entry);
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
