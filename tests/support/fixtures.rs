use std::sync::Arc;

use tradelane::application::fetch::RateLimitedFetcher;
use tradelane::port::HttpResponse;
use tradelane::testkit::market::{body, order};
use tradelane::testkit::transport::{base_url, ScriptedTransport};

pub const FORGE: u32 = 10_000_002;
pub const DOMAIN: u32 = 10_000_043;

pub fn transport() -> Arc<ScriptedTransport> {
    Arc::new(ScriptedTransport::new())
}

pub fn fetcher(transport: &Arc<ScriptedTransport>) -> RateLimitedFetcher {
    RateLimitedFetcher::new(transport.clone(), base_url())
}

/// A page of `count` sell orders with ids starting at `first_id`.
pub fn sell_page(first_id: u64, count: u64, total_pages: u32) -> HttpResponse {
    let orders: Vec<_> = (first_id..first_id + count)
        .map(|id| order(id, 34, false, 5.0 + id as f64))
        .collect();
    HttpResponse::ok(body(&orders)).with_header("X-Pages", total_pages.to_string())
}

/// Order book key of page `page` for one region and side.
pub fn orders_key(region: u32, side: &str, page: u32) -> String {
    format!("/markets/{region}/orders/?order_type={side}&page={page}")
}
