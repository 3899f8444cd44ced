//! Composition root: wires the universe, fetcher and caches together.

use std::sync::Arc;

use tracing::info;
use url::Url;

use super::config::Config;
use super::universe::load_universe;
use crate::adapter::outbound::esi::{EsiConfig, ReqwestTransport};
use crate::adapter::outbound::memory::{MemoryHistoryStore, MemoryStationNameStore};
use crate::application::cache::{
    ContractCache, HistoryCache, IndustryCache, OrderBookLoader, OrderCache, RegionalSellCache,
    StationNameCache,
};
use crate::application::fetch::RateLimitedFetcher;
use crate::domain::UniverseGraph;
use crate::error::{FetchError, Result};
use crate::port::{HistoryStore, HttpTransport, StationNameStore};

/// Persistent tiers handed to the caches. In-memory by default.
#[derive(Clone)]
pub struct Stores {
    pub station_names: Arc<dyn StationNameStore>,
    pub history: Arc<dyn HistoryStore>,
}

impl Default for Stores {
    fn default() -> Self {
        Self {
            station_names: Arc::new(MemoryStationNameStore::new()),
            history: Arc::new(MemoryHistoryStore::new()),
        }
    }
}

/// Every read interface the scanners consume, sharing one fetcher and
/// therefore one concurrency ceiling.
pub struct MarketCore {
    pub universe: Arc<UniverseGraph>,
    pub fetcher: RateLimitedFetcher,
    pub stations: StationNameCache,
    pub industry: IndustryCache,
    pub sell_minima: RegionalSellCache,
    pub contracts: ContractCache,
    pub history: HistoryCache,
    pub orders: OrderBookLoader,
}

impl MarketCore {
    /// Load the universe file and connect to the configured API.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe file cannot be loaded or the base
    /// URL is invalid.
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let universe = load_universe(&config.universe_path)?;
        let transport = Arc::new(ReqwestTransport::from_config(&config.esi));
        Self::from_parts(config, universe, transport, Stores::default())
    }

    /// Assemble from an already built graph and transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_parts(
        config: &Config,
        universe: UniverseGraph,
        transport: Arc<dyn HttpTransport>,
        stores: Stores,
    ) -> Result<Self> {
        let fetcher = build_fetcher(transport, &config.esi)?;
        let ttl = &config.cache;

        let core = Self {
            universe: Arc::new(universe),
            stations: StationNameCache::new(fetcher.clone()).with_store(stores.station_names),
            industry: IndustryCache::with_ttls(fetcher.clone(), ttl.cost_index_ttl(), ttl.price_ttl()),
            sell_minima: RegionalSellCache::with_ttl(fetcher.clone(), ttl.sell_minimum_ttl()),
            contracts: ContractCache::with_ttl(fetcher.clone(), ttl.contract_ttl()),
            history: HistoryCache::new(fetcher.clone(), stores.history),
            orders: OrderBookLoader::new(fetcher.clone(), Arc::new(OrderCache::new())),
            fetcher,
        };

        info!(
            locations = core.universe.location_count(),
            max_concurrency = core.fetcher.max_concurrency(),
            "Market core ready"
        );
        Ok(core)
    }

    #[must_use]
    pub fn order_cache(&self) -> &Arc<OrderCache> {
        self.orders.cache()
    }
}

/// Apply the API settings to a new fetcher.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if the base URL does not parse.
pub fn build_fetcher(
    transport: Arc<dyn HttpTransport>,
    config: &EsiConfig,
) -> std::result::Result<RateLimitedFetcher, FetchError> {
    let base_url = Url::parse(&config.base_url)?;
    let datasource = Some(config.datasource.clone()).filter(|d| !d.is_empty());
    Ok(RateLimitedFetcher::new(transport, base_url)
        .with_max_concurrency(config.max_concurrency)
        .with_batch_workers(config.batch_workers)
        .with_progress_interval(config.progress_interval)
        .with_datasource(datasource)
        .with_access_token(config.access_token.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fetch::DEFAULT_MAX_CONCURRENCY;
    use crate::domain::TypeId;
    use crate::testkit::market::{body, price};
    use crate::testkit::transport::ScriptedTransport;
    use crate::testkit::universe::abcd;

    fn config() -> Config {
        let mut config = Config::default();
        config.esi.base_url = "http://esi.test/".into();
        config
    }

    #[tokio::test]
    async fn caches_share_one_fetcher() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_ok("/markets/prices/", body(&[price(34, 4.5, 5.0)]));

        let core = MarketCore::from_parts(&config(), abcd(1.0), transport.clone(), Stores::default())
            .unwrap();

        assert_eq!(core.industry.adjusted_price(TypeId::new(34)).await, Ok(4.5));
        assert_eq!(core.fetcher.max_concurrency(), DEFAULT_MAX_CONCURRENCY);
        assert_eq!(core.universe.location_count(), 4);
        assert!(core.order_cache().is_empty());

        let request = transport.requests().pop().unwrap();
        assert_eq!(request.url.query(), Some("datasource=tranquility"));
    }

    #[tokio::test]
    async fn fetcher_carries_limits_and_token() {
        let mut esi = config().esi;
        esi.max_concurrency = 7;
        esi.access_token = Some("secret".into());
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_ok("/markets/prices/", "[]");

        let fetcher = build_fetcher(transport.clone(), &esi).unwrap();
        let _: Vec<u32> = fetcher.fetch_json("markets/prices/").await.unwrap();

        assert_eq!(fetcher.max_concurrency(), 7);
        assert_eq!(fetcher.available_permits(), 7);
        let request = transport.requests().pop().unwrap();
        assert_eq!(request.bearer_token.as_deref(), Some("secret"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut config = config();
        config.esi.base_url = "not a url".into();

        let result = MarketCore::from_parts(
            &config,
            abcd(1.0),
            Arc::new(ScriptedTransport::new()),
            Stores::default(),
        );

        assert!(result.is_err());
    }
}
