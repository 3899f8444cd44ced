//! Station name resolution with in-process, persistent and remote tiers.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::fetch::RateLimitedFetcher;
use crate::domain::{StationId, StationInfo};
use crate::error::FetchError;
use crate::port::StationNameStore;

/// Identifiers the public station endpoint can resolve. Anything outside
/// is a player structure.
pub const NPC_STATION_IDS: RangeInclusive<u64> = 60_000_000..=64_000_000;

/// Whether `id` belongs to an NPC station.
#[must_use]
pub fn is_npc_station(id: StationId) -> bool {
    NPC_STATION_IDS.contains(&id.get())
}

/// Deterministic label for a location that cannot be resolved publicly.
#[must_use]
pub fn placeholder_name(id: StationId) -> String {
    format!("Structure {id}")
}

/// Station names never expire; a name is fetched once and promoted into
/// every faster tier on the way back.
#[derive(Clone)]
pub struct StationNameCache {
    memory: Arc<DashMap<StationId, String>>,
    store: Option<Arc<dyn StationNameStore>>,
    fetcher: RateLimitedFetcher,
}

impl StationNameCache {
    /// Cache without a persistent tier.
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        Self {
            memory: Arc::new(DashMap::new()),
            store: None,
            fetcher,
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn StationNameStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Name held in process memory, without touching slower tiers.
    #[must_use]
    pub fn cached(&self, id: StationId) -> Option<String> {
        self.memory.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of names held in process memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Resolve the name of `id`.
    ///
    /// Player structures get [`placeholder_name`]. A failing persistent
    /// store is treated as a miss; a failing remote lookup is returned.
    pub async fn name(&self, id: StationId) -> Result<String, FetchError> {
        if let Some(name) = self.cached(id) {
            debug!(station = %id, "Station name hit in memory");
            return Ok(name);
        }
        if !is_npc_station(id) {
            return Ok(placeholder_name(id));
        }

        if let Some(name) = self.lookup_store(id).await {
            debug!(station = %id, "Station name hit in store");
            self.memory.insert(id, name.clone());
            return Ok(name);
        }

        let info: StationInfo = self
            .fetcher
            .fetch_json(&format!("universe/stations/{id}/"))
            .await?;
        info!(station = %id, name = %info.name, "Resolved station name");

        self.memory.insert(id, info.name.clone());
        if let Some(store) = &self.store {
            if let Err(err) = store.store(id, &info.name).await {
                warn!(station = %id, error = %err, "Failed to persist station name");
            }
        }
        Ok(info.name)
    }

    /// Resolve every id not yet held in memory, one task per id, and wait
    /// for all of them. Returns how many names were newly resolved.
    ///
    /// Failures are logged and skipped; a later [`Self::name`] call retries
    /// them.
    pub async fn prefetch<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = StationId>,
    {
        let missing: HashSet<StationId> = ids
            .into_iter()
            .filter(|id| is_npc_station(*id) && !self.memory.contains_key(id))
            .collect();
        if missing.is_empty() {
            return 0;
        }

        let requested = missing.len();
        let mut tasks = JoinSet::new();
        for id in missing {
            let cache = self.clone();
            tasks.spawn(async move { (id, cache.name(id).await) });
        }

        let mut resolved = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(_))) => resolved += 1,
                Ok((id, Err(err))) => {
                    warn!(station = %id, error = %err, "Station prefetch failed");
                }
                Err(err) => warn!(error = %err, "Station prefetch task aborted"),
            }
        }
        info!(requested, resolved, "Station prefetch finished");
        resolved
    }

    async fn lookup_store(&self, id: StationId) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.lookup(id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(station = %id, error = %err, "Station store lookup failed");
                None
            }
        }
    }
}
