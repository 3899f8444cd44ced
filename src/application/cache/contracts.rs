//! Public contracts, one independently aging list per region.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::application::fetch::RateLimitedFetcher;
use crate::domain::{Contract, RegionId};
use crate::error::FetchError;

use super::slot::TtlSlot;

/// Default lifetime of a region's contract list.
pub const CONTRACT_TTL: Duration = Duration::from_secs(5 * 60);

pub type ContractList = Arc<Vec<Contract>>;

type RegionSlot = Arc<TtlSlot<(), ContractList>>;

/// Public contracts keyed by region.
///
/// Every region owns its own slot, so one region refreshing never blocks or
/// expires another.
pub struct ContractCache {
    fetcher: RateLimitedFetcher,
    ttl: Duration,
    regions: Mutex<HashMap<RegionId, RegionSlot>>,
}

impl ContractCache {
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        Self::with_ttl(fetcher, CONTRACT_TTL)
    }

    #[must_use]
    pub fn with_ttl(fetcher: RateLimitedFetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            regions: Mutex::new(HashMap::new()),
        }
    }

    /// Every public contract currently listed in `region`.
    pub async fn contracts(&self, region: RegionId) -> Result<ContractList, FetchError> {
        let slot = self.slot(region);
        slot.get_or_refresh((), |()| async move {
            let page = self
                .fetcher
                .fetch_paginated::<Contract>(&format!("contracts/public/{region}/"))
                .await?;
            Ok(Arc::new(page.items))
        })
        .await
    }

    /// Regions that have been requested at least once.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.lock().len()
    }

    fn slot(&self, region: RegionId) -> RegionSlot {
        let mut regions = self.regions.lock();
        let slot = regions
            .entry(region)
            .or_insert_with(|| Arc::new(TtlSlot::new("contracts", self.ttl)));
        Arc::clone(slot)
    }
}
