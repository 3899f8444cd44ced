//! Lowest sell price per item type in one region.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::fetch::RateLimitedFetcher;
use crate::domain::{MarketOrder, OrderSide, RegionId, TypeId};
use crate::error::FetchError;

use super::slot::TtlSlot;

/// Default lifetime of a region's sell minima.
pub const SELL_MINIMUM_TTL: Duration = Duration::from_secs(10 * 60);

pub type SellMinima = Arc<HashMap<TypeId, f64>>;

/// Sell minima of the most recently requested region.
///
/// Only one region is held at a time: asking for another region replaces
/// the table.
pub struct RegionalSellCache {
    fetcher: RateLimitedFetcher,
    minima: TtlSlot<RegionId, SellMinima>,
}

impl RegionalSellCache {
    #[must_use]
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        Self::with_ttl(fetcher, SELL_MINIMUM_TTL)
    }

    #[must_use]
    pub fn with_ttl(fetcher: RateLimitedFetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            minima: TtlSlot::new("sell_minima", ttl),
        }
    }

    /// Lowest sell price of every type listed in `region`.
    pub async fn sell_minima(&self, region: RegionId) -> Result<SellMinima, FetchError> {
        self.minima
            .get_or_refresh(region, |region| async move {
                let path = format!(
                    "markets/{region}/orders/?order_type={}",
                    OrderSide::Sell.as_str()
                );
                let page = self.fetcher.fetch_paginated::<MarketOrder>(&path).await?;
                let minima = lowest_sell_prices(&page.items);
                debug!(
                    region = %region,
                    types = minima.len(),
                    complete = page.is_complete(),
                    "Computed sell minima"
                );
                Ok(Arc::new(minima))
            })
            .await
    }

    /// Lowest sell price of `type_id` in `region`, zero if nobody sells it.
    pub async fn sell_minimum(&self, region: RegionId, type_id: TypeId) -> Result<f64, FetchError> {
        let minima = self.sell_minima(region).await?;
        Ok(minima.get(&type_id).copied().unwrap_or(0.0))
    }
}

fn lowest_sell_prices(orders: &[MarketOrder]) -> HashMap<TypeId, f64> {
    let mut minima: HashMap<TypeId, f64> = HashMap::new();
    for order in orders.iter().filter(|order| !order.is_buy_order) {
        minima
            .entry(order.type_id)
            .and_modify(|best| *best = best.min(order.price))
            .or_insert(order.price);
    }
    minima
}
