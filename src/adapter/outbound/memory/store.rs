//! Map-backed station name and history stores.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{HistoryEntry, HistoryKey, RegionId, StationId, TypeId};
use crate::error::Result;
use crate::port::{HistoryStore, StationNameStore};

/// Station names held in a map.
#[derive(Debug, Default)]
pub struct MemoryStationNameStore {
    names: RwLock<HashMap<StationId, String>>,
}

impl MemoryStationNameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StationNameStore for MemoryStationNameStore {
    async fn lookup(&self, id: StationId) -> Result<Option<String>> {
        Ok(self.names.read().get(&id).cloned())
    }

    async fn store(&self, id: StationId, name: &str) -> Result<()> {
        self.names.write().insert(id, name.to_string());
        Ok(())
    }
}

/// History series held in a map.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    series: RwLock<HashMap<HistoryKey, Vec<HistoryEntry>>>,
}

impl MemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn lookup(&self, region: RegionId, type_id: TypeId) -> Result<Option<Vec<HistoryEntry>>> {
        Ok(self.series.read().get(&(region, type_id)).cloned())
    }

    async fn store(&self, region: RegionId, type_id: TypeId, entries: &[HistoryEntry]) -> Result<()> {
        self.series
            .write()
            .insert((region, type_id), entries.to_vec());
        Ok(())
    }
}
