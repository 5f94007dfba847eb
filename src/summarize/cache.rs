// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL-based summary caching

use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// Cache of finished summaries keyed by [`fingerprint`]
///
/// Expired entries are removed when a lookup finds them; nothing sweeps in the
/// background. Inserting past `max_entries` evicts the least recently used entry.
pub struct SummaryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    summary: String,
    created_at: Instant,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total entries in cache
    pub total: usize,
    /// Expired entries (not yet evicted)
    pub expired: usize,
    /// Maximum cache capacity
    pub max: usize,
}

/// Derive the cache key for a summarization input
///
/// SHA-256 over the trimmed text and the requested length, hex encoded. The
/// length is an integer and never contains `_`, so distinct inputs never share
/// a preimage.
pub fn fingerprint(text: &str, max_length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", text.trim(), max_length).as_bytes());
    hex::encode(hasher.finalize())
}

impl SummaryCache {
    /// Create a new summary cache
    ///
    /// # Arguments
    /// * `ttl` - How long an entry stays readable
    /// * `max_entries` - Maximum number of entries to store
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self::with_clock(ttl, max_entries, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    /// Get the cached summary for `key`
    ///
    /// Returns None if not found. An expired entry is deleted and reported as
    /// missing.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let created_at = entries.peek(key)?.created_at;
        if now.duration_since(created_at) >= self.ttl {
            entries.pop(key);
            return None;
        }

        entries.get(key).map(|entry| entry.summary.clone())
    }

    /// Insert or overwrite the summary for `key`
    pub fn put(&self, key: &str, summary: &str) {
        let created_at = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(
            key.to_string(),
            CacheEntry {
                summary: summary.to_string(),
                created_at,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cache entries
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.created_at) >= self.ttl)
            .count();

        CacheStats {
            total: entries.len(),
            expired,
            max: entries.cap().get(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
