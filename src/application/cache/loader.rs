//! Fetch-on-expiry bridge between the market API and [`OrderCache`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::application::fetch::RateLimitedFetcher;
use crate::domain::{MarketOrder, OrderSide, RegionId, SideFilter};
use crate::error::FetchError;

use super::order::{OrderCache, OrderSnapshot, OrderWindow};

/// Lifetime in seconds used when the API does not advertise an expiry.
pub const FALLBACK_ORDER_TTL_SECS: i64 = 300;

type RefreshLock = Arc<tokio::sync::Mutex<()>>;

/// Loads regional order books into an [`OrderCache`], going to the API only
/// when the stored entry has expired.
///
/// Refreshes are serialized per (region, side): concurrent callers on one
/// expired key share a single fetch and a single revision.
#[derive(Clone)]
pub struct OrderBookLoader {
    fetcher: RateLimitedFetcher,
    cache: Arc<OrderCache>,
    refreshing: Arc<Mutex<HashMap<(RegionId, OrderSide), RefreshLock>>>,
}

impl OrderBookLoader {
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher, cache: Arc<OrderCache>) -> Self {
        Self {
            fetcher,
            cache,
            refreshing: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<OrderCache> {
        &self.cache
    }

    /// The order book of (`region`, `side`), served from the cache while it
    /// is unexpired.
    pub async fn load(&self, region: RegionId, side: OrderSide) -> Result<OrderSnapshot, FetchError> {
        if let Some(snapshot) = self.unexpired(region, side) {
            return Ok(snapshot);
        }

        let lock = self.refresh_lock(region, side);
        let _guard = lock.lock().await;
        if let Some(snapshot) = self.unexpired(region, side) {
            return Ok(snapshot);
        }

        let path = format!("markets/{region}/orders/?order_type={}", side.as_str());
        let page = self.fetcher.fetch_paginated::<MarketOrder>(&path).await?;
        if !page.is_complete() {
            warn!(
                region = %region,
                side = %side,
                failed_pages = ?page.failed_pages,
                "Storing partial order book"
            );
        }

        let expires_at = page
            .expires_at
            .unwrap_or_else(|| Utc::now() + Duration::seconds(FALLBACK_ORDER_TTL_SECS));
        Ok(self.cache.put(region, side, page.items, expires_at))
    }

    fn unexpired(&self, region: RegionId, side: OrderSide) -> Option<OrderSnapshot> {
        self.cache
            .get(region, side)
            .filter(|snapshot| !snapshot.is_expired_at(Utc::now()))
    }

    fn refresh_lock(&self, region: RegionId, side: OrderSide) -> RefreshLock {
        self.refreshing.lock().entry((region, side)).or_default().clone()
    }

    /// Load every side selected by `filter` for each region concurrently,
    /// then summarise the resulting window. Failed loads are logged and
    /// leave whatever the cache already held.
    pub async fn load_regions<I>(&self, regions: I, filter: SideFilter) -> OrderWindow
    where
        I: IntoIterator<Item = RegionId>,
    {
        let regions: BTreeSet<RegionId> = regions.into_iter().collect();

        let mut tasks = JoinSet::new();
        for &region in &regions {
            for side in OrderSide::ALL.into_iter().filter(|side| filter.matches(*side)) {
                let loader = self.clone();
                tasks.spawn(async move { (region, side, loader.load(region, side).await) });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, _, Ok(_))) => {}
                Ok((region, side, Err(err))) => {
                    warn!(region = %region, side = %side, error = %err, "Order book load failed");
                }
                Err(err) => warn!(error = %err, "Order book task aborted"),
            }
        }

        let window = self.cache.window_for_regions(regions, filter);
        info!(
            regions = window.regions,
            entries = window.entries,
            revision = window.revision,
            "Order books loaded"
        );
        window
    }
}
