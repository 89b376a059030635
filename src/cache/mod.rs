//! Time-bounded cache in front of the raw document fetch.
//!
//! [`SourceCache::get`] decides per call whether the stored document is still
//! fresh. On a miss it runs the caller's fetch function; when that fails it
//! serves the last stored value regardless of age, and only reports a
//! [`FetchError`] when nothing is stored at all.
//!
//! The cache takes `&mut self` for every lookup, so two lookups against the
//! same store cannot interleave between the read and the conditional write.

pub mod store;

use crate::error::{FetchError, NetworkError};
use crate::models::{CacheEntry, RawDocument};
use store::CacheStore;
use tracing::{info, instrument, warn};

/// TTL cache over an injected [`CacheStore`].
#[derive(Debug)]
pub struct SourceCache<S> {
    store: S,
}

impl<S: CacheStore> SourceCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the document stored under `key`, refetching it once it is
    /// `ttl` milliseconds old.
    ///
    /// An entry is fresh while `now - fetched_at < ttl`. The store is written
    /// only after a successful fetch; the new `fetched_at` never goes below
    /// the one already stored.
    ///
    /// # Errors
    ///
    /// [`FetchError`] when the fetch fails and there is no stored entry to
    /// fall back to.
    #[instrument(level = "info", skip_all, fields(%key, now = now, ttl_ms = ttl))]
    pub async fn get<F, Fut>(
        &mut self,
        key: &str,
        now: u64,
        fetch: F,
        ttl: u64,
    ) -> Result<RawDocument, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawDocument, NetworkError>>,
    {
        let cached = match self.store.load(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Cache store read failed; treating as miss");
                None
            }
        };

        if let Some(ref entry) = cached {
            let age_ms = entry.age(now);
            if age_ms < ttl {
                info!(age_ms, "Cache hit");
                return Ok(entry.value.clone());
            }
            info!(age_ms, "Cache entry expired; refetching");
        } else {
            info!("Cache miss; fetching");
        }

        match fetch().await {
            Ok(value) => {
                let fetched_at = cached
                    .as_ref()
                    .map_or(now, |prev| prev.fetched_at.max(now));
                let entry = CacheEntry {
                    value,
                    fetched_at,
                };
                if let Err(e) = self.store.save(key, &entry).await {
                    warn!(error = %e, "Failed to persist fetched document");
                }
                Ok(entry.value)
            }
            Err(source) => match cached {
                Some(entry) => {
                    warn!(
                        error = %source,
                        age_ms = entry.age(now),
                        "Fetch failed; serving stale cached copy"
                    );
                    Ok(entry.value)
                }
                None => Err(FetchError {
                    key: key.to_string(),
                    source,
                }),
            },
        }
    }
}
