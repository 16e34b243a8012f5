//! In-memory response store with FIFO eviction and TTL expiry.

use super::key::CacheKey;
use crate::types::Payload;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Default capacity bound. Request patterns are bursty and short-lived per
/// user session, so a small bound is enough to absorb a session's worth of
/// repeats without unbounded growth across distinct prompts.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

struct StoredEntry {
    payload: Payload,
    context: String,
    created: Instant,
    inserted_at: SystemTime,
    ttl: Duration,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        self.created.elapsed() >= self.ttl
    }
}

struct Inner {
    entries: HashMap<String, StoredEntry>,
    /// Key hashes in insertion order; front is the eviction candidate.
    order: VecDeque<String>,
}

/// Bounded, process-local memoization of successful responses.
///
/// Eviction is insertion-order (FIFO), not least-recently-used: the entry
/// that was inserted earliest goes first when the store is full. Expiry is
/// lazy: a stale entry is treated as absent on lookup and removed when
/// observed; no background sweep runs.
///
/// The whole lookup/insert/evict sequence runs under one mutex so the
/// capacity bound holds under concurrent callers.
pub struct ResponseCache {
    inner: Mutex<Inner>,
    max_entries: usize,
    counters: Counters,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time view of the cache, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub entries: Vec<CacheEntryInfo>,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Summary of one live entry. The payload itself is never exposed here.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryInfo {
    /// The context label of the request that produced the entry.
    pub context: String,
    /// Insertion time as milliseconds since the Unix epoch.
    pub inserted_at_ms: u64,
    /// Age at snapshot time, in milliseconds.
    pub age_ms: u64,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            // A zero bound would make every insert evict itself.
            max_entries: max_entries.max(1),
            counters: Counters::default(),
        }
    }

    /// Return the payload for `key` if a live entry exists.
    ///
    /// A stale entry is removed on observation and reported as absent.
    pub fn lookup(&self, key: &CacheKey) -> Option<Payload> {
        let mut inner = self.inner.lock().unwrap();
        let expired = match inner.entries.get(key.as_str()) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.payload.clone());
            }
            None => false,
        };
        if expired {
            Self::remove(&mut inner, key.as_str());
            debug!(key = %key, "cache entry expired");
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert a payload under `key`, evicting the earliest-inserted entry
    /// first if the store is at capacity.
    ///
    /// Re-inserting an existing key replaces the entry and counts as a new
    /// insertion: fresh timestamp, back of the eviction queue.
    pub fn insert(&self, key: &CacheKey, payload: Payload, ttl: Duration, context: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.contains_key(key.as_str()) {
            Self::remove(&mut inner, key.as_str());
        } else {
            // Drop dead weight before sacrificing a live entry.
            self.purge_expired(&mut inner);
            while inner.entries.len() >= self.max_entries {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                    self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %oldest, "cache entry evicted at capacity");
                } else {
                    break;
                }
            }
        }
        inner.order.push_back(key.as_str().to_string());
        inner.entries.insert(
            key.as_str().to_string(),
            StoredEntry {
                payload,
                context: context.to_string(),
                created: Instant::now(),
                inserted_at: SystemTime::now(),
                ttl,
            },
        );
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        self.purge_expired(&mut inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the cache for diagnostics, in insertion order.
    pub fn stats(&self) -> CacheStats {
        let mut inner = self.inner.lock().unwrap();
        self.purge_expired(&mut inner);
        let entries = inner
            .order
            .iter()
            .filter_map(|hash| inner.entries.get(hash))
            .map(|entry| CacheEntryInfo {
                context: entry.context.clone(),
                inserted_at_ms: entry
                    .inserted_at
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64,
                age_ms: entry.created.elapsed().as_millis() as u64,
            })
            .collect();
        CacheStats {
            size: inner.entries.len(),
            max_size: self.max_entries,
            entries,
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    fn remove(inner: &mut Inner, hash: &str) {
        inner.entries.remove(hash);
        inner.order.retain(|h| h != hash);
    }

    fn purge_expired(&self, inner: &mut Inner) {
        let stale: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired())
            .map(|(k, _)| k.clone())
            .collect();
        for hash in stale {
            Self::remove(inner, &hash);
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}
