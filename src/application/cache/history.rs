//! Regional trade history, backed by a persistent store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::fetch::{ProgressFn, RateLimitedFetcher};
use crate::domain::{HistoryEntry, RegionId, TypeId};
use crate::error::FetchError;
use crate::port::HistoryStore;

fn history_path(region: RegionId, type_id: TypeId) -> String {
    format!("markets/{region}/history/?type_id={type_id}")
}

/// History series are fetched once per (region, type) and kept in the
/// store; the store is the only tier.
#[derive(Clone)]
pub struct HistoryCache {
    store: Arc<dyn HistoryStore>,
    fetcher: RateLimitedFetcher,
}

impl HistoryCache {
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher, store: Arc<dyn HistoryStore>) -> Self {
        Self { store, fetcher }
    }

    /// Daily history of `type_id` in `region`. A type that never traded
    /// yields an empty series.
    pub async fn history(
        &self,
        region: RegionId,
        type_id: TypeId,
    ) -> Result<Vec<HistoryEntry>, FetchError> {
        if let Some(entries) = self.lookup(region, type_id).await {
            debug!(region = %region, type_id = %type_id, "History hit in store");
            return Ok(entries);
        }

        let entries: Vec<HistoryEntry> = self
            .fetcher
            .fetch_optional(&history_path(region, type_id))
            .await?
            .unwrap_or_default();
        self.persist(region, type_id, &entries).await;
        Ok(entries)
    }

    /// Fetch every series of `types` not yet stored, in one batch.
    /// Returns how many series were stored.
    pub async fn prefetch(
        &self,
        region: RegionId,
        types: &[TypeId],
        progress: Option<ProgressFn<'_>>,
    ) -> usize {
        let mut jobs = Vec::new();
        for &type_id in types {
            if self.lookup(region, type_id).await.is_none() {
                jobs.push((type_id, history_path(region, type_id)));
            }
        }
        let requested = jobs.len();

        let outcome = self
            .fetcher
            .fetch_batch::<TypeId, Vec<HistoryEntry>>(jobs, progress)
            .await;

        let mut stored = 0;
        for (type_id, entries) in outcome.present() {
            self.persist(region, *type_id, entries).await;
            stored += 1;
        }
        info!(region = %region, requested, stored, "History prefetch finished");
        stored
    }

    async fn lookup(&self, region: RegionId, type_id: TypeId) -> Option<Vec<HistoryEntry>> {
        match self.store.lookup(region, type_id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(region = %region, type_id = %type_id, error = %err, "History store lookup failed");
                None
            }
        }
    }

    async fn persist(&self, region: RegionId, type_id: TypeId, entries: &[HistoryEntry]) {
        if let Err(err) = self.store.store(region, type_id, entries).await {
            warn!(region = %region, type_id = %type_id, error = %err, "Failed to persist history");
        }
    }
}
