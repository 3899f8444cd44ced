//! Recording store double for the persistence ports.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{HistoryEntry, HistoryKey, RegionId, StationId, TypeId};
use crate::error::{Error, Result};
use crate::port::{HistoryStore, StationNameStore};

/// Implements both store ports over plain maps, counts every call and can
/// be switched into a failing mode.
#[derive(Debug, Default)]
pub struct RecordingStore {
    names: Mutex<HashMap<StationId, String>>,
    series: Mutex<HashMap<HistoryKey, Vec<HistoryEntry>>>,
    lookups: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed_name(&self, id: StationId, name: &str) {
        self.names.lock().insert(id, name.to_string());
    }

    pub fn seed_history(&self, region: RegionId, type_id: TypeId, entries: Vec<HistoryEntry>) {
        self.series.lock().insert((region, type_id), entries);
    }

    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.lock().len()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.lock().len()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Io(io::Error::other("store unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl StationNameStore for RecordingStore {
    async fn lookup(&self, id: StationId) -> Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.names.lock().get(&id).cloned())
    }

    async fn store(&self, id: StationId, name: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.names.lock().insert(id, name.to_string());
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for RecordingStore {
    async fn lookup(&self, region: RegionId, type_id: TypeId) -> Result<Option<Vec<HistoryEntry>>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.series.lock().get(&(region, type_id)).cloned())
    }

    async fn store(&self, region: RegionId, type_id: TypeId, entries: &[HistoryEntry]) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.series.lock().insert((region, type_id), entries.to_vec());
        Ok(())
    }
}
