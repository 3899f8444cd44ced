//! Per-resource caches over the rate-limited fetcher.
//!
//! - [`slot::TtlSlot`]: the double-checked, single-flight TTL refresh every
//!   time-bounded cache is built on
//! - [`StationNameCache`]: memory, then persistent store, then API; no TTL
//! - [`IndustryCache`]: cost indices (1h) and adjusted/average prices (30m)
//! - [`RegionalSellCache`]: lowest sell price per type for one region (10m)
//! - [`ContractCache`]: public contracts, per-region clocks (5m)
//! - [`HistoryCache`]: trade history through the persistent store
//! - [`OrderCache`] and [`OrderBookLoader`]: revision-stamped order books

pub mod contracts;
pub mod history;
pub mod industry;
pub mod loader;
pub mod order;
pub mod regional;
pub mod slot;
pub mod station;

pub use contracts::{ContractCache, ContractList, CONTRACT_TTL};
pub use history::HistoryCache;
pub use industry::{CostIndexTable, IndustryCache, PriceTable, COST_INDEX_TTL, PRICE_TTL};
pub use loader::{OrderBookLoader, FALLBACK_ORDER_TTL_SECS};
pub use order::{OrderCache, OrderSnapshot, OrderWindow};
pub use regional::{RegionalSellCache, SellMinima, SELL_MINIMUM_TTL};
pub use slot::{CacheEntry, TtlSlot};
pub use station::{is_npc_station, placeholder_name, StationNameCache, NPC_STATION_IDS};
