//! Cache-aware paper fetching with rate-limit retries.
//!
//! `PaperFetcher` sits between the traversal and a `PaperSource`. The
//! cache is consulted before the network and rate-limited lookups retry
//! on a linear backoff schedule. An unobtainable paper comes back as
//! `None` rather than an error the traversal would have to unwind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::cache::PaperCache;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::types::{PaperId, PaperRecord};

/// A remote source of paper metadata.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn lookup(&self, id: &PaperId) -> Result<PaperRecord, FetchError>;
}

/// Fetches papers through a cache with retry handling.
pub struct PaperFetcher {
    source: Arc<dyn PaperSource>,
    cache: Arc<dyn PaperCache>,
    retry_base_delay: Duration,
    max_retries: u32,
}

impl PaperFetcher {
    pub fn new(
        source: Arc<dyn PaperSource>,
        cache: Arc<dyn PaperCache>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            source,
            cache,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_retries: config.max_retries,
        }
    }

    /// Fetch one paper. Cached entries are authoritative and skip the
    /// network entirely. Returns `None` when the paper cannot be
    /// obtained; the caller decides what an absent paper means.
    pub async fn fetch(&self, id: &PaperId) -> Option<PaperRecord> {
        match self.cache.get(id) {
            Ok(Some(record)) => {
                tracing::debug!("Cache hit for {}", id);
                return Some(record);
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache degrades to a miss rather than failing
                // the lookup.
                tracing::warn!("Cache read failed for {}: {}", id, e);
            }
        }

        let record = self.fetch_remote(id).await?;

        if let Err(e) = self.cache.put(&record) {
            tracing::warn!("Cache write failed for {}: {}", id, e);
        }
        Some(record)
    }

    /// Remote lookup with pacing. Every attempt, including the first,
    /// waits `retry_base_delay * (attempt + 1)` before calling out.
    /// Only rate-limit responses are retried.
    async fn fetch_remote(&self, id: &PaperId) -> Option<PaperRecord> {
        for attempt in 0..=self.max_retries {
            sleep(self.retry_base_delay * (attempt + 1)).await;
            match self.source.lookup(id).await {
                Ok(record) => return Some(record),
                Err(FetchError::RateLimited) => {
                    if attempt == self.max_retries {
                        tracing::warn!(
                            "Giving up on {} after {} rate-limited attempts",
                            id,
                            attempt + 1
                        );
                        return None;
                    }
                    tracing::warn!("Rate limited on {} (attempt {}), will retry", id, attempt + 1);
                }
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", id, e);
                    return None;
                }
            }
        }
        None
    }
}

// ── Static source ────────────────────────────────────────────────────────────

/// Fixed in-memory paper source.
///
/// Useful for tests and offline experiments: preload records with
/// `insert`, then inspect `calls` to check what the engine looked up.
#[derive(Debug, Default)]
pub struct StaticPaperSource {
    papers: Mutex<HashMap<PaperId, PaperRecord>>,
    calls: Mutex<Vec<PaperId>>,
}

impl StaticPaperSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: PaperRecord) {
        self.papers.lock().unwrap().insert(record.id.clone(), record);
    }

    /// Ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<PaperId> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `id` was looked up.
    pub fn lookup_count(&self, id: &PaperId) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }
}

#[async_trait]
impl PaperSource for StaticPaperSource {
    async fn lookup(&self, id: &PaperId) -> Result<PaperRecord, FetchError> {
        self.calls.lock().unwrap().push(id.clone());
        self.papers
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { id: id.to_string() })
    }
}
