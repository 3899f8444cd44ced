//! Persistence ports for station names and trade history.
//!
//! Both are minimal get/set capabilities so any storage engine can back
//! them. Errors are reported but the caches treat a failing store as a miss.

use async_trait::async_trait;

use crate::domain::{HistoryEntry, RegionId, StationId, TypeId};
use crate::error::Result;

/// Durable storage for resolved station names.
#[async_trait]
pub trait StationNameStore: Send + Sync {
    /// Look up a stored name. `Ok(None)` means not found.
    async fn lookup(&self, id: StationId) -> Result<Option<String>>;

    /// Persist a resolved name, replacing any previous value.
    async fn store(&self, id: StationId, name: &str) -> Result<()>;
}

/// Durable storage for regional trade history series.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Look up a stored series. `Ok(None)` means not found.
    async fn lookup(&self, region: RegionId, type_id: TypeId) -> Result<Option<Vec<HistoryEntry>>>;

    /// Persist a series, replacing any previous value.
    async fn store(&self, region: RegionId, type_id: TypeId, entries: &[HistoryEntry]) -> Result<()>;
}
