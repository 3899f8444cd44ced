//! Industry cost indices and server-wide item prices.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::application::fetch::RateLimitedFetcher;
use crate::domain::{LocationId, MarketPrice, SystemCostIndices, TypeId};
use crate::error::FetchError;

use super::slot::TtlSlot;

/// Default lifetime of the cost index table.
pub const COST_INDEX_TTL: Duration = Duration::from_secs(60 * 60);
/// Default lifetime of the adjusted/average price table.
pub const PRICE_TTL: Duration = Duration::from_secs(30 * 60);

const COST_INDEX_PATH: &str = "industry/systems/";
const PRICE_PATH: &str = "markets/prices/";

pub type CostIndexTable = Arc<HashMap<LocationId, SystemCostIndices>>;
pub type PriceTable = Arc<HashMap<TypeId, MarketPrice>>;

/// Two independently aging tables, each fetched as a complete set.
pub struct IndustryCache {
    fetcher: RateLimitedFetcher,
    cost_indices: TtlSlot<(), CostIndexTable>,
    prices: TtlSlot<(), PriceTable>,
}

impl IndustryCache {
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        Self::with_ttls(fetcher, COST_INDEX_TTL, PRICE_TTL)
    }

    #[must_use]
    pub fn with_ttls(fetcher: RateLimitedFetcher, cost_index_ttl: Duration, price_ttl: Duration) -> Self {
        Self {
            fetcher,
            cost_indices: TtlSlot::new("cost_indices", cost_index_ttl),
            prices: TtlSlot::new("prices", price_ttl),
        }
    }

    /// Cost indices of every system, keyed by system.
    pub async fn cost_indices(&self) -> Result<CostIndexTable, FetchError> {
        self.cost_indices
            .get_or_refresh((), |()| async {
                let rows: Vec<SystemCostIndices> = self.fetcher.fetch_json(COST_INDEX_PATH).await?;
                let table = rows
                    .into_iter()
                    .map(|row| (row.solar_system_id, row))
                    .collect::<HashMap<_, _>>();
                Ok(Arc::new(table))
            })
            .await
    }

    /// Cost index of `activity` in `system`; zero when the system or the
    /// activity is not listed.
    pub async fn cost_index(&self, system: LocationId, activity: &str) -> Result<f64, FetchError> {
        let table = self.cost_indices().await?;
        Ok(table
            .get(&system)
            .and_then(|indices| indices.index_for(activity))
            .unwrap_or(0.0))
    }

    /// Adjusted and average prices of every item type.
    pub async fn prices(&self) -> Result<PriceTable, FetchError> {
        self.prices
            .get_or_refresh((), |()| async {
                let rows: Vec<MarketPrice> = self.fetcher.fetch_json(PRICE_PATH).await?;
                let table = rows
                    .into_iter()
                    .map(|row| (row.type_id, row))
                    .collect::<HashMap<_, _>>();
                Ok(Arc::new(table))
            })
            .await
    }

    /// Adjusted price of `type_id`, zero if unknown.
    pub async fn adjusted_price(&self, type_id: TypeId) -> Result<f64, FetchError> {
        let table = self.prices().await?;
        Ok(table
            .get(&type_id)
            .and_then(|price| price.adjusted_price)
            .unwrap_or(0.0))
    }

    /// Average price of `type_id`, zero if unknown.
    pub async fn average_price(&self, type_id: TypeId) -> Result<f64, FetchError> {
        let table = self.prices().await?;
        Ok(table
            .get(&type_id)
            .and_then(|price| price.average_price)
            .unwrap_or(0.0))
    }
}
