//! Tag-aware read-through response cache.
//!
//! Stores opaque serialized payloads keyed by list identity. On a miss the
//! caller-supplied producer runs, its output is stored with the entry's tags
//! and TTL, and later reads for the same key are served from memory until the
//! entry expires or a write invalidates its tags.
//!
//! Concurrency: misses for the same key coalesce onto a single producer run
//! (per-key flight lock); waiters re-check the table and hit once the leader
//! has stored. Entry table and tag index share one lock so they can never
//! disagree. An invalidation that completes while a population is in flight
//! bumps the table generation; the late population is returned to its caller
//! but not stored, so reads that start after the invalidation never observe
//! pre-invalidation data.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use bytes::Bytes;
use metrics::{counter, gauge, histogram};
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use super::config::CacheConfig;
use super::lock::{mutex_lock, rw_read, rw_write};
use super::tags::TagIndex;

const SOURCE: &str = "cache::store";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache key must not be blank")]
    BlankKey,
    #[error("cache tag must not be blank")]
    BlankTag,
    #[error("invalidation requires at least one tag")]
    EmptyTagSet,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Bytes,
    tags: BTreeSet<String>,
    created_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now < self.created_at + ttl,
            None => true,
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    tags: TagIndex,
    /// Bumped on every invalidation; populations that started under an older
    /// generation are returned but not stored.
    generation: u64,
}

/// In-memory tag-aware response cache.
pub struct ResponseCache {
    config: CacheConfig,
    inner: RwLock<Inner>,
    flights: Mutex<HashMap<String, Weak<tokio::sync::Mutex<()>>>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Read-through lookup.
    ///
    /// Returns the cached payload for `key` when a live entry exists;
    /// otherwise runs `producer`, stores its output under `tags` with `ttl`,
    /// and returns it. Producer errors propagate unchanged and cache nothing.
    /// With the cache disabled, degrades to calling the producer directly.
    pub async fn get_or_populate<F, Fut, E>(
        &self,
        key: &str,
        tags: &[&str],
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<Bytes, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
        E: From<CacheError>,
    {
        if key.trim().is_empty() {
            return Err(CacheError::BlankKey.into());
        }
        if tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(CacheError::BlankTag.into());
        }

        if !self.config.enabled {
            return producer().await;
        }

        if let Some(value) = self.lookup(key) {
            counter!("folio_cache_hit_total").increment(1);
            return Ok(value);
        }
        counter!("folio_cache_miss_total").increment(1);

        let flight = self.flight(key);
        let _leader = flight.lock().await;

        // A concurrent caller may have stored while we waited for the flight.
        if let Some(value) = self.lookup(key) {
            counter!("folio_cache_hit_total").increment(1);
            debug!(key, "coalesced onto concurrent population");
            return Ok(value);
        }

        let generation = rw_read(&self.inner, SOURCE, "generation").generation;
        let started = Instant::now();
        let value = producer().await?;
        histogram!("folio_cache_populate_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        let tag_set: BTreeSet<String> = tags.iter().map(|tag| tag.to_string()).collect();
        self.store(key, tag_set, ttl, value.clone(), generation);
        Ok(value)
    }

    /// Remove every entry stored under any of the requested tags.
    ///
    /// Covers expired entries too, keeping the tag index consistent. Unknown
    /// tags are a no-op. Returns the number of entries removed.
    pub fn invalidate(&self, tags: &[&str]) -> Result<usize, CacheError> {
        if tags.is_empty() {
            return Err(CacheError::EmptyTagSet);
        }
        if tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(CacheError::BlankTag);
        }

        if !self.config.enabled {
            return Ok(0);
        }

        let mut inner = rw_write(&self.inner, SOURCE, "invalidate");
        inner.generation += 1;

        let keys = inner.tags.keys_for_any(tags);
        let mut removed = 0usize;
        for key in &keys {
            if let Some(entry) = inner.entries.remove(key) {
                inner.tags.unregister(key, &entry.tags);
                removed += 1;
            }
        }

        counter!("folio_cache_invalidated_total").increment(removed as u64);
        gauge!("folio_cache_entries").set(inner.entries.len() as f64);
        debug!(?tags, removed, "invalidated tagged cache entries");
        Ok(removed)
    }

    /// Number of entries currently stored, live or expired.
    pub fn len(&self) -> usize {
        rw_read(&self.inner, SOURCE, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Option<Bytes> {
        let now = Instant::now();
        {
            let inner = rw_read(&self.inner, SOURCE, "lookup");
            match inner.entries.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop the dead entry so the table reflects liveness.
        let mut inner = rw_write(&self.inner, SOURCE, "lookup.expire");
        match inner.entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                if let Some(dead) = inner.entries.remove(key) {
                    inner.tags.unregister(key, &dead.tags);
                }
                gauge!("folio_cache_entries").set(inner.entries.len() as f64);
                None
            }
            None => None,
        }
    }

    fn store(
        &self,
        key: &str,
        tags: BTreeSet<String>,
        ttl: Option<Duration>,
        value: Bytes,
        generation: u64,
    ) {
        let mut inner = rw_write(&self.inner, SOURCE, "store");
        if inner.generation != generation {
            debug!(key, "discarding population that overlapped an invalidation");
            return;
        }

        if let Some(old) = inner.entries.remove(key) {
            inner.tags.unregister(key, &old.tags);
        }
        inner.tags.register(key, &tags);
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                tags,
                created_at: Instant::now(),
                ttl,
            },
        );
        gauge!("folio_cache_entries").set(inner.entries.len() as f64);
    }

    /// Per-key flight slot. Weak entries self-clean once all participants of
    /// a population have dropped their handles; dead slots are swept on access.
    fn flight(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = mutex_lock(&self.flights, SOURCE, "flight");
        flights.retain(|_, slot| slot.strong_count() > 0);

        if let Some(slot) = flights.get(key).and_then(Weak::upgrade) {
            return slot;
        }
        let slot = Arc::new(tokio::sync::Mutex::new(()));
        flights.insert(key.to_string(), Arc::downgrade(&slot));
        slot
    }
}
