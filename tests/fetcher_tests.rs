//! Rate-limited fetching: pagination, concurrency ceiling and batches.

mod support;

use std::sync::Arc;

use parking_lot::Mutex;
use tradelane::application::fetch::RateLimitedFetcher;
use tradelane::domain::{HistoryEntry, MarketOrder};
use tradelane::error::FetchError;
use tradelane::port::HttpResponse;
use tradelane::testkit::market::{body, history_day};
use tradelane::testkit::transport::{base_url, ScriptedTransport};

use support::fixtures::{fetcher, orders_key, sell_page, transport, FORGE};

fn order_ids(orders: &[MarketOrder]) -> Vec<u64> {
    let mut ids: Vec<u64> = orders.iter().map(|order| order.order_id).collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn failed_page_is_dropped_and_reported() {
    let transport = transport();
    transport.respond(&orders_key(FORGE, "sell", 1), sell_page(100, 3, 3));
    transport.respond_status(&orders_key(FORGE, "sell", 2), 502, "bad gateway");
    transport.respond(&orders_key(FORGE, "sell", 3), sell_page(300, 2, 3));

    let page = fetcher(&transport)
        .fetch_paginated::<MarketOrder>(&format!("markets/{FORGE}/orders/?order_type=sell"))
        .await
        .unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.failed_pages, vec![2]);
    assert!(!page.is_complete());
    assert_eq!(order_ids(&page.items), vec![100, 101, 102, 300, 301]);
}

#[tokio::test]
async fn item_count_is_the_sum_of_pages() {
    let transport = transport();
    for page in 1..=4 {
        transport.respond(
            &orders_key(FORGE, "sell", page),
            sell_page(u64::from(page) * 1_000, u64::from(page), 4),
        );
    }

    let page = fetcher(&transport)
        .fetch_paginated::<MarketOrder>(&format!("markets/{FORGE}/orders/?order_type=sell"))
        .await
        .unwrap();

    assert!(page.is_complete());
    assert_eq!(page.items.len(), 1 + 2 + 3 + 4);
    assert_eq!(transport.calls(), 4);
}

#[tokio::test]
async fn first_page_status_error_is_returned() {
    let transport = transport();
    transport.respond_status(&orders_key(FORGE, "sell", 1), 420, "error limited");

    let err = fetcher(&transport)
        .fetch_paginated::<MarketOrder>(&format!("markets/{FORGE}/orders/?order_type=sell"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Status {
            status: 420,
            body: "error limited".into()
        }
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn expires_header_is_surfaced() {
    let transport = transport();
    transport.respond(
        &orders_key(FORGE, "sell", 1),
        sell_page(1, 1, 1).with_header("Expires", "Wed, 01 May 2024 12:05:00 GMT"),
    );

    let page = fetcher(&transport)
        .fetch_paginated::<MarketOrder>(&format!("markets/{FORGE}/orders/?order_type=sell"))
        .await
        .unwrap();

    let expires = page.expires_at.unwrap();
    assert_eq!(expires.to_rfc3339(), "2024-05-01T12:05:00+00:00");
}

#[tokio::test]
async fn requests_carry_datasource_and_token() {
    let transport = transport();
    transport.respond_ok("/markets/prices/", "[]");
    let fetcher = RateLimitedFetcher::new(transport.clone(), base_url())
        .with_datasource(Some("tranquility".into()))
        .with_access_token(Some("token".into()));

    let rows: Vec<serde_json::Value> = fetcher.fetch_json("/markets/prices/").await.unwrap();

    assert!(rows.is_empty());
    let request = transport.requests().pop().unwrap();
    assert_eq!(
        request.url.as_str(),
        "http://esi.test/markets/prices/?datasource=tranquility"
    );
    assert_eq!(request.bearer_token.as_deref(), Some("token"));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let transport = transport();
    transport.respond_ok("/markets/prices/", "<html>maintenance</html>");

    let result = fetcher(&transport)
        .fetch_json::<Vec<serde_json::Value>>("markets/prices/")
        .await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[tokio::test(start_paused = true)]
async fn pagination_fan_out_respects_the_ceiling() {
    let transport = Arc::new(ScriptedTransport::new().with_latency_ms(20));
    for page in 1..=12 {
        transport.respond(&orders_key(FORGE, "sell", page), sell_page(u64::from(page), 1, 12));
    }
    let fetcher = RateLimitedFetcher::new(transport.clone(), base_url()).with_max_concurrency(3);

    let page = fetcher
        .fetch_paginated::<MarketOrder>(&format!("markets/{FORGE}/orders/?order_type=sell"))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 12);
    assert_eq!(transport.max_in_flight(), 3);
    assert_eq!(fetcher.available_permits(), 3);
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_ceiling() {
    let transport = Arc::new(ScriptedTransport::new().with_latency_ms(10));
    transport.respond_ok("/markets/prices/", "[]");
    let fetcher = RateLimitedFetcher::new(transport.clone(), base_url()).with_max_concurrency(5);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..40 {
        let fetcher = fetcher.clone();
        tasks.spawn(async move {
            fetcher
                .fetch_json::<Vec<serde_json::Value>>("markets/prices/")
                .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        assert!(joined.unwrap().is_ok());
    }

    assert_eq!(transport.calls(), 40);
    assert_eq!(transport.max_in_flight(), 5);
}

#[tokio::test(start_paused = true)]
async fn batch_records_every_item_and_reports_progress() {
    let transport = Arc::new(ScriptedTransport::new().with_latency_ms(5));
    for type_id in 0..120u32 {
        let key = format!("/markets/{FORGE}/history/?type_id={type_id}");
        match type_id % 3 {
            0 => transport.respond_ok(&key, body(&[history_day("2024-05-01", 1.0)])),
            1 => transport.respond_ok(&key, "[]"),
            _ => {}
        }
    }
    let fetcher = RateLimitedFetcher::new(transport.clone(), base_url())
        .with_max_concurrency(4)
        .with_batch_workers(16)
        .with_progress_interval(50);

    let jobs: Vec<(u32, String)> = (0..120)
        .map(|type_id| (type_id, format!("markets/{FORGE}/history/?type_id={type_id}")))
        .collect();
    let reports = Mutex::new(Vec::new());
    let progress = |done: usize, total: usize| reports.lock().push((done, total));

    let outcome = fetcher
        .fetch_batch::<u32, Vec<HistoryEntry>>(jobs, Some(&progress))
        .await;

    assert_eq!(outcome.len(), 120);
    assert_eq!(outcome.present().count(), 40);
    assert_eq!(outcome.absent().count(), 80);
    assert!(outcome.present().all(|(type_id, _)| type_id % 3 == 0));
    assert_eq!(*reports.lock(), vec![(50, 120), (100, 120), (120, 120)]);
    assert!(transport.max_in_flight() <= 4);
}

#[tokio::test]
async fn empty_batch_makes_no_requests() {
    let transport = transport();

    let outcome = fetcher(&transport)
        .fetch_batch::<u32, Vec<HistoryEntry>>(Vec::new(), None)
        .await;

    assert!(outcome.is_empty());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn transport_failure_surfaces_on_single_fetch() {
    let transport = transport();
    transport.fail("/markets/prices/", FetchError::Timeout);
    transport.respond_once("/markets/prices/", HttpResponse::ok("[]"));
    let fetcher = fetcher(&transport);

    assert!(fetcher
        .fetch_json::<Vec<serde_json::Value>>("markets/prices/")
        .await
        .is_ok());
    assert_eq!(
        fetcher
            .fetch_json::<Vec<serde_json::Value>>("markets/prices/")
            .await,
        Err(FetchError::Timeout)
    );
}
