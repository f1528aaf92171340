// ABOUTME: Caching decorator for media lookups with LRU eviction and TTL expiry
// ABOUTME: Forwards only cache misses to the inner lookup and remembers confirmed misses too
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::debug;

use super::MediaLookup;
use crate::config::MediaCachePolicy;
use crate::errors::AppResult;

/// Cached lookup result; `url == None` records a confirmed miss
#[derive(Debug, Clone)]
struct CacheEntry {
    url: Option<String>,
    /// `None` when the TTL reaches past the representable clock range
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(url: Option<String>, ttl: Duration) -> Self {
        Self {
            url,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

/// Media lookup wrapped in a bounded, TTL-based cache
///
/// The eviction policy is injected through [`MediaCachePolicy`]; nothing is
/// global, so each context owns its own cache.
pub struct CachedMediaLookup<L> {
    inner: L,
    store: RwLock<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl<L: MediaLookup> CachedMediaLookup<L> {
    /// Capacity used when the policy asks for zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Wrap `inner` with the given policy
    pub fn new(inner: L, policy: MediaCachePolicy) -> Self {
        let capacity = NonZeroUsize::new(policy.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            inner,
            store: RwLock::new(LruCache::new(capacity)),
            ttl: policy.ttl,
        }
    }

    /// Number of cached names, including expired entries not yet evicted
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache holds nothing
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Drop every cached entry
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Split `names` into cached hits and names that need the inner lookup
    async fn partition(&self, names: &[String]) -> (HashMap<String, String>, Vec<String>) {
        let mut hits = HashMap::new();
        let mut misses = Vec::new();
        let mut seen = HashSet::new();

        let mut store = self.store.write().await;
        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match store.get(name) {
                Some(entry) if !entry.is_expired() => {
                    if let Some(url) = &entry.url {
                        hits.insert(name.clone(), url.clone());
                    }
                }
                Some(_) => {
                    store.pop(name);
                    misses.push(name.clone());
                }
                None => misses.push(name.clone()),
            }
        }
        drop(store);

        (hits, misses)
    }
}

#[async_trait]
impl<L: MediaLookup> MediaLookup for CachedMediaLookup<L> {
    async fn get_assets(&self, names: &[String]) -> AppResult<HashMap<String, String>> {
        let (mut assets, misses) = self.partition(names).await;
        if misses.is_empty() {
            return Ok(assets);
        }

        debug!(
            cached = assets.len(),
            forwarded = misses.len(),
            "Media cache forwarding misses"
        );
        // Failures are not cached, so the next call retries
        let fetched = self.inner.get_assets(&misses).await?;

        let mut store = self.store.write().await;
        for name in misses {
            let url = fetched.get(&name).cloned();
            store.push(name.clone(), CacheEntry::new(url.clone(), self.ttl));
            if let Some(url) = url {
                assets.insert(name, url);
            }
        }
        drop(store);

        Ok(assets)
    }
}
