//! Shared translation cache for controllers.
//!
//! Wrapping a backend in [`CachedBackend`] and handing the same `Arc` to many
//! controllers means identical `(text, target, source)` requests reach the
//! endpoint at most once at a time: concurrent callers join the in-flight
//! request, later callers get the stored answer. Only successful answers are
//! kept, only in memory, and only until they expire or are evicted to stay
//! under the entry cap.

use crate::client::{TranslateBackend, TranslationRequest};
use crate::error::BackendError;
use crate::metrics::TranslationMetrics;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a stored translation is served before it is requested again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Upper bound on stored translations per cache.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

type SharedReply = Shared<BoxFuture<'static, Result<Option<String>, String>>>;

enum Entry {
    Ready { text: String, expires_at: Instant },
    Pending { id: u64, reply: SharedReply },
}

enum Lookup {
    Hit(String),
    Wait { id: u64, reply: SharedReply },
}

pub struct CachedBackend<B> {
    inner: Arc<B>,
    entries: Mutex<HashMap<TranslationRequest, Entry>>,
    metrics: Arc<TranslationMetrics>,
    ttl: Duration,
    max_entries: usize,
    next_id: AtomicU64,
}

impl<B: TranslateBackend + 'static> CachedBackend<B> {
    pub fn new(inner: B, metrics: Arc<TranslationMetrics>) -> Self {
        Self {
            inner: Arc::new(inner),
            entries: Mutex::new(HashMap::new()),
            metrics,
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cap on stored translations. At the cap, expired entries are dropped
    /// first, then the one closest to expiry. A cap of zero is treated as one.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Number of stored translations that have not expired.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|entry| matches!(entry, Entry::Ready { expires_at, .. } if *expires_at > now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TranslationRequest, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup_or_start(&self, request: &TranslationRequest) -> Lookup {
        let mut entries = self.lock();

        match entries.get(request) {
            Some(Entry::Ready { text, expires_at }) if *expires_at > Instant::now() => {
                self.metrics.record_cache_hit();
                return Lookup::Hit(text.clone());
            }
            Some(Entry::Pending { id, reply }) => {
                self.metrics.record_cache_hit();
                debug!("Joining in-flight translation request");
                return Lookup::Wait {
                    id: *id,
                    reply: reply.clone(),
                };
            }
            Some(Entry::Ready { .. }) => debug!("Cached translation expired, requesting again"),
            None => {}
        }

        self.metrics.record_cache_miss();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let owned = request.clone();
        let reply = async move { inner.request(&owned).await.map_err(|e| e.to_string()) }
            .boxed()
            .shared();
        entries.insert(
            request.clone(),
            Entry::Pending {
                id,
                reply: reply.clone(),
            },
        );
        Lookup::Wait { id, reply }
    }

    /// Record the outcome of in-flight request `id`. Only the first waiter of
    /// that request changes the map; a waiter arriving after the key was
    /// settled and restarted leaves the newer request alone.
    fn settle(
        &self,
        request: &TranslationRequest,
        id: u64,
        outcome: &Result<Option<String>, String>,
    ) {
        let mut entries = self.lock();

        match entries.get(request) {
            Some(Entry::Pending { id: current, .. }) if *current == id => {}
            _ => return,
        }
        entries.remove(request);

        if let Ok(Some(text)) = outcome {
            if !text.is_empty() {
                self.make_room(&mut entries);
                entries.insert(
                    request.clone(),
                    Entry::Ready {
                        text: text.clone(),
                        expires_at: Instant::now() + self.ttl,
                    },
                );
            }
        }
    }

    fn make_room(&self, entries: &mut HashMap<TranslationRequest, Entry>) {
        if ready_count(entries) < self.max_entries {
            return;
        }

        let now = Instant::now();
        entries.retain(|_, entry| match entry {
            Entry::Ready { expires_at, .. } => *expires_at > now,
            Entry::Pending { .. } => true,
        });

        while ready_count(entries) >= self.max_entries {
            let oldest = entries
                .iter()
                .filter_map(|(key, entry)| match entry {
                    Entry::Ready { expires_at, .. } => Some((key, *expires_at)),
                    Entry::Pending { .. } => None,
                })
                .min_by_key(|(_, expires_at)| *expires_at)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    debug!("Translation cache full, evicting oldest entry");
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

fn ready_count(entries: &HashMap<TranslationRequest, Entry>) -> usize {
    entries
        .values()
        .filter(|entry| matches!(entry, Entry::Ready { .. }))
        .count()
}

#[async_trait]
impl<B: TranslateBackend + 'static> TranslateBackend for CachedBackend<B> {
    async fn request(&self, request: &TranslationRequest) -> Result<Option<String>, BackendError> {
        let (id, reply) = match self.lookup_or_start(request) {
            Lookup::Hit(text) => return Ok(Some(text)),
            Lookup::Wait { id, reply } => (id, reply),
        };

        let outcome = reply.await;
        self.settle(request, id, &outcome);
        outcome.map_err(BackendError::Other)
    }
}
