//! Exchange-agnostic domain types: identifiers, market records and the
//! universe graph with its routing queries.

pub mod id;
pub mod market;
pub mod routing;
pub mod universe;

pub use id::{LocationId, RegionId, StationId, TypeId};
pub use market::{
    ActivityCostIndex, Contract, HistoryEntry, HistoryKey, MarketOrder, MarketPrice, OrderSide,
    SideFilter, StationInfo, SystemCostIndices,
};
pub use routing::HopMap;
pub use universe::{Location, UniverseBuilder, UniverseGraph};
