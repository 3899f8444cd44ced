//! Cache lifetimes.

use std::time::Duration;

use serde::Deserialize;

/// Per-resource time-to-live, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cost_index_ttl_secs")]
    pub cost_index_ttl_secs: u64,
    #[serde(default = "default_price_ttl_secs")]
    pub price_ttl_secs: u64,
    #[serde(default = "default_sell_minimum_ttl_secs")]
    pub sell_minimum_ttl_secs: u64,
    #[serde(default = "default_contract_ttl_secs")]
    pub contract_ttl_secs: u64,
}

const fn default_cost_index_ttl_secs() -> u64 {
    3600
}

const fn default_price_ttl_secs() -> u64 {
    1800
}

const fn default_sell_minimum_ttl_secs() -> u64 {
    600
}

const fn default_contract_ttl_secs() -> u64 {
    300
}

impl CacheConfig {
    #[must_use]
    pub const fn cost_index_ttl(&self) -> Duration {
        Duration::from_secs(self.cost_index_ttl_secs)
    }

    #[must_use]
    pub const fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_secs)
    }

    #[must_use]
    pub const fn sell_minimum_ttl(&self) -> Duration {
        Duration::from_secs(self.sell_minimum_ttl_secs)
    }

    #[must_use]
    pub const fn contract_ttl(&self) -> Duration {
        Duration::from_secs(self.contract_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cost_index_ttl_secs: default_cost_index_ttl_secs(),
            price_ttl_secs: default_price_ttl_secs(),
            sell_minimum_ttl_secs: default_sell_minimum_ttl_secs(),
            contract_ttl_secs: default_contract_ttl_secs(),
        }
    }
}
