//! Revision-stamped order book snapshots per (region, side).
//!
//! Every write bumps one global revision counter, so a caller can compare
//! the revision it last saw against [`OrderCache::revision`] to learn
//! whether anything changed at all. Expiry is explicit per entry and only
//! reported, never enforced: entries stay until replaced or [`OrderCache::clear`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::{MarketOrder, OrderSide, RegionId, SideFilter};

/// The latest order book pages stored for one region and side.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub region: RegionId,
    pub side: OrderSide,
    pub orders: Arc<Vec<MarketOrder>>,
    pub expires_at: DateTime<Utc>,
    pub written_at: DateTime<Utc>,
    /// Global revision at the time of this write.
    pub revision: u64,
}

impl OrderSnapshot {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Seconds until expiry, never negative.
    #[must_use]
    pub fn remaining_secs_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// Freshness summary over the entries matching a region set and side.
///
/// The TTL and timestamp fields are `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderWindow {
    /// Distinct regions with at least one matching entry.
    pub regions: usize,
    pub entries: usize,
    /// Global revision when the window was computed.
    pub revision: u64,
    pub min_ttl_secs: Option<i64>,
    pub max_ttl_secs: Option<i64>,
    pub next_expiry: Option<DateTime<Utc>>,
    pub last_refresh: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Snapshots {
    entries: HashMap<(RegionId, OrderSide), OrderSnapshot>,
    revision: u64,
}

/// In-memory order book snapshot store.
#[derive(Default)]
pub struct OrderCache {
    inner: RwLock<Snapshots>,
}

impl OrderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `orders` for (`region`, `side`), replacing any previous entry.
    /// Returns the stored snapshot with the revision assigned to the write.
    pub fn put(
        &self,
        region: RegionId,
        side: OrderSide,
        orders: Vec<MarketOrder>,
        expires_at: DateTime<Utc>,
    ) -> OrderSnapshot {
        self.put_at(region, side, orders, expires_at, Utc::now())
    }

    /// [`Self::put`] with an explicit write time.
    pub fn put_at(
        &self,
        region: RegionId,
        side: OrderSide,
        orders: Vec<MarketOrder>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> OrderSnapshot {
        let count = orders.len();
        let snapshot = {
            let mut inner = self.inner.write();
            inner.revision += 1;
            let snapshot = OrderSnapshot {
                region,
                side,
                orders: Arc::new(orders),
                expires_at,
                written_at: now,
                revision: inner.revision,
            };
            inner.entries.insert((region, side), snapshot.clone());
            snapshot
        };

        debug!(
            region = %region,
            side = %side,
            orders = count,
            revision = snapshot.revision,
            "Stored order snapshot"
        );
        snapshot
    }

    #[must_use]
    pub fn get(&self, region: RegionId, side: OrderSide) -> Option<OrderSnapshot> {
        self.inner.read().entries.get(&(region, side)).cloned()
    }

    /// Current global revision; zero before the first write.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summarise freshness of the entries in `regions` matching `filter`.
    pub fn window_for_regions<I>(&self, regions: I, filter: SideFilter) -> OrderWindow
    where
        I: IntoIterator<Item = RegionId>,
    {
        self.window_for_regions_at(regions, filter, Utc::now())
    }

    /// [`Self::window_for_regions`] evaluated at `now`.
    pub fn window_for_regions_at<I>(
        &self,
        regions: I,
        filter: SideFilter,
        now: DateTime<Utc>,
    ) -> OrderWindow
    where
        I: IntoIterator<Item = RegionId>,
    {
        let wanted: HashSet<RegionId> = regions.into_iter().collect();
        let inner = self.inner.read();

        let mut window = OrderWindow {
            revision: inner.revision,
            ..OrderWindow::default()
        };
        let mut touched = HashSet::new();

        for snapshot in inner
            .entries
            .values()
            .filter(|s| wanted.contains(&s.region) && filter.matches(s.side))
        {
            touched.insert(snapshot.region);
            window.entries += 1;

            let ttl = snapshot.remaining_secs_at(now);
            window.min_ttl_secs = Some(window.min_ttl_secs.map_or(ttl, |m| m.min(ttl)));
            window.max_ttl_secs = Some(window.max_ttl_secs.map_or(ttl, |m| m.max(ttl)));
            window.next_expiry = Some(
                window
                    .next_expiry
                    .map_or(snapshot.expires_at, |t| t.min(snapshot.expires_at)),
            );
            window.last_refresh = Some(
                window
                    .last_refresh
                    .map_or(snapshot.written_at, |t| t.max(snapshot.written_at)),
            );
        }
        window.regions = touched.len();
        window
    }

    /// Drop every entry. Returns how many were removed. The revision
    /// counter is left untouched.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.entries.len();
            inner.entries.clear();
            removed
        };
        info!(removed, "Cleared order snapshots");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const FORGE: RegionId = RegionId::new(10_000_002);
    const DOMAIN: RegionId = RegionId::new(10_000_043);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn scenario() -> OrderCache {
        let cache = OrderCache::new();
        let now = t0();
        cache.put_at(FORGE, OrderSide::Sell, Vec::new(), now + Duration::minutes(5), now);
        cache.put_at(FORGE, OrderSide::Buy, Vec::new(), now + Duration::minutes(2), now);
        cache.put_at(DOMAIN, OrderSide::Sell, Vec::new(), now + Duration::minutes(9), now);
        cache
    }

    #[test]
    fn sell_window_across_two_regions() {
        let cache = scenario();

        let window = cache.window_for_regions_at([FORGE, DOMAIN], SideFilter::Sell, t0());

        assert_eq!(window.entries, 2);
        assert_eq!(window.regions, 2);
        assert_eq!(window.revision, 3);
        assert_eq!(window.min_ttl_secs, Some(300));
        assert_eq!(window.max_ttl_secs, Some(540));
        assert_eq!(window.next_expiry, Some(t0() + Duration::minutes(5)));
    }

    #[test]
    fn all_sides_window_for_one_region() {
        let cache = scenario();

        let window = cache.window_for_regions_at([FORGE], SideFilter::All, t0());

        assert_eq!(window.entries, 2);
        assert_eq!(window.regions, 1);
        assert_eq!(window.min_ttl_secs, Some(120));
        assert_eq!(window.next_expiry, Some(t0() + Duration::minutes(2)));
        assert_eq!(window.last_refresh, Some(t0()));
    }

    #[test]
    fn duplicate_regions_are_counted_once() {
        let cache = scenario();

        let window = cache.window_for_regions_at([FORGE, FORGE, FORGE], SideFilter::Sell, t0());

        assert_eq!(window.entries, 1);
        assert_eq!(window.regions, 1);
    }

    #[test]
    fn remaining_ttl_is_clamped_at_zero() {
        let cache = scenario();
        let later = t0() + Duration::minutes(6);

        let window = cache.window_for_regions_at([FORGE], SideFilter::All, later);

        assert_eq!(window.min_ttl_secs, Some(0));
        assert_eq!(window.max_ttl_secs, Some(0));
    }

    #[test]
    fn unmatched_window_is_empty_but_carries_revision() {
        let cache = scenario();

        let window = cache.window_for_regions_at([RegionId::new(1)], SideFilter::All, t0());

        assert_eq!(window.entries, 0);
        assert_eq!(window.regions, 0);
        assert_eq!(window.revision, 3);
        assert_eq!(window.min_ttl_secs, None);
        assert_eq!(window.last_refresh, None);
    }

    #[test]
    fn revision_increases_on_every_put_regardless_of_key() {
        let cache = OrderCache::new();
        let mut last = cache.revision();
        for side in [OrderSide::Sell, OrderSide::Sell, OrderSide::Buy] {
            let revision = cache.put(FORGE, side, Vec::new(), t0()).revision;
            assert!(revision > last);
            last = revision;
        }
        assert_eq!(cache.get(FORGE, OrderSide::Sell).map(|s| s.revision), Some(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_reports_removed_count() {
        let cache = scenario();

        assert_eq!(cache.clear(), 3);
        assert!(cache.is_empty());
        assert_eq!(
            cache.window_for_regions_at([FORGE, DOMAIN], SideFilter::All, t0()).entries,
            0
        );
        assert_eq!(cache.revision(), 3);
    }

    #[test]
    fn concurrent_puts_get_distinct_revisions() {
        let cache = Arc::new(OrderCache::new());
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| {
                            cache
                                .put(RegionId::new(i), OrderSide::Buy, Vec::new(), t0())
                                .revision
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut revisions: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        revisions.sort_unstable();
        revisions.dedup();

        assert_eq!(revisions.len(), 400);
        assert_eq!(cache.revision(), 400);
    }
}
