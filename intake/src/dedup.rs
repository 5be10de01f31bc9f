// Short-lived memory of recently seen payloads, used to drop retried deliveries.
use crate::metrics_defs::{DEDUP_HIT, DEDUP_MISS};
use moka::sync::Cache;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use shared::counter;
use std::time::{Duration, Instant};

pub struct DedupCache {
    // Keyed by the digest of the canonical payload, valued by first sight.
    cache: Cache<String, Instant>,
}

impl DedupCache {
    pub fn new(window: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(window)
            .build();

        DedupCache { cache }
    }

    /// Records `payload` and reports whether an identical one was seen within
    /// the window. A hit does not extend the original entry's lifetime.
    ///
    /// Concurrent callers with the same payload are coalesced on the entry's
    /// initializer, so exactly one of them sees it as new.
    pub fn is_duplicate(&self, payload: &Value) -> bool {
        let key = canonical_key(payload);
        let entry = self.cache.entry(key).or_insert_with(Instant::now);
        let duplicate = !entry.is_fresh();

        let metric_def = if duplicate { DEDUP_HIT } else { DEDUP_MISS };
        counter!(metric_def).increment(1);
        duplicate
    }
}

/// Digest of the payload serialized with object keys sorted at every level.
pub fn canonical_key(payload: &Value) -> String {
    let canonical = canonicalize(payload);
    let digest = Sha256::digest(canonical.to_string().as_bytes());
    hex::encode(digest)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
