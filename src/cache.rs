//! Bounded, single-flight cache of parsed spec documents.
//!
//! Parsing a contract document is expensive; validation happens once per
//! inbound request. The cache memoizes loader results by spec identifier,
//! bounded by an LRU capacity and an idle TTL, and collapses concurrent
//! misses on the same key into one loader invocation.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::error::SpecError;
use crate::loader::{LoaderOptions, SpecLoader};
use crate::spec::SpecDocument;

/// Default maximum number of cached documents.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default idle eviction timeout (10 minutes since last access).
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(600);

type LoadFn = dyn Fn(&str) -> Result<SpecDocument, SpecError> + Send + Sync;
type LoadOutcome = Result<Arc<SpecDocument>, SpecError>;

/// Capacity and eviction settings for a [`SpecCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries; least-recently-used entries are evicted
    /// when full.
    pub capacity: usize,
    /// Entries idle for longer than this are dropped on next access.
    pub idle_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }
}

struct CacheEntry {
    doc: Arc<SpecDocument>,
    last_access: Instant,
}

/// Thread-safe, single-flight spec document cache.
///
/// `get` returns a shared handle to the parsed document; documents are
/// immutable, so handles are safe to use concurrently from many sessions.
/// Failed loads are never cached: the next `get` for that key retries.
pub struct SpecCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    // One cell per in-flight load; concurrent callers for the same key wait
    // on the same cell, so the loader runs at most once per miss.
    pending: Mutex<HashMap<String, Arc<OnceLock<LoadOutcome>>>>,
    load: Box<LoadFn>,
    idle_ttl: Duration,
}

impl SpecCache {
    /// Build a cache backed by the default [`SpecLoader`].
    pub fn new(config: CacheConfig, loader_options: LoaderOptions) -> Self {
        let loader = SpecLoader::new(loader_options);
        Self::with_load_fn(config, move |spec_id| loader.load(spec_id))
    }

    /// Build a cache backed by an arbitrary load function.
    ///
    /// This is the seam for hosts with their own document sources and for
    /// tests that count loader invocations.
    pub fn with_load_fn<F>(config: CacheConfig, load: F) -> Self
    where
        F: Fn(&str) -> Result<SpecDocument, SpecError> + Send + Sync + 'static,
    {
        let capacity = NonZeroUsize::new(config.capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            pending: Mutex::new(HashMap::new()),
            load: Box::new(load),
            idle_ttl: config.idle_ttl,
        }
    }

    /// Fetch the document for `spec_id`, loading it on first touch.
    ///
    /// # Errors
    ///
    /// Returns the loader's `SpecError` if the document cannot be obtained.
    /// Concurrent callers for the same missing key all observe the same
    /// outcome, success or failure.
    pub fn get(&self, spec_id: &str) -> Result<Arc<SpecDocument>, SpecError> {
        if let Some(doc) = self.lookup_fresh(spec_id) {
            return Ok(doc);
        }

        let cell = {
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            pending
                .entry(spec_id.to_string())
                .or_insert_with(|| Arc::new(OnceLock::new()))
                .clone()
        };

        // All callers holding the same cell block here until one load
        // completes; only the first closure runs.
        let outcome = cell
            .get_or_init(|| (self.load)(spec_id).map(Arc::new))
            .clone();

        {
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(current) = pending.get(spec_id) {
                if Arc::ptr_eq(current, &cell) {
                    pending.remove(spec_id);
                }
            }
        }

        if let Ok(doc) = &outcome {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            entries.put(
                spec_id.to_string(),
                CacheEntry {
                    doc: doc.clone(),
                    last_access: Instant::now(),
                },
            );
        }

        outcome
    }

    /// Number of currently cached documents.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached documents.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Return the cached document if present and not idle-expired,
    /// refreshing its access time.
    fn lookup_fresh(&self, spec_id: &str) -> Option<Arc<SpecDocument>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(spec_id) {
            if entry.last_access.elapsed() <= self.idle_ttl {
                entry.last_access = Instant::now();
                return Some(entry.doc.clone());
            }
            entries.pop(spec_id);
        }
        None
    }
}

impl std::fmt::Debug for SpecCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecCache")
            .field("len", &self.len())
            .field("idle_ttl", &self.idle_ttl)
            .finish()
    }
}
