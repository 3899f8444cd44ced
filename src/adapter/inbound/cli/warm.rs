//! Handler for the `warm` command.

use serde_json::json;

use super::command::WarmArgs;
use super::output;
use crate::application::cache::{HistoryCache, OrderBookLoader, OrderWindow};
use crate::domain::{RegionId, TypeId};

/// Execute the warm command: load order books, then prefetch history for
/// the requested types.
pub async fn execute(
    orders: &OrderBookLoader,
    history: &HistoryCache,
    args: &WarmArgs,
) -> OrderWindow {
    let regions: Vec<RegionId> = args.regions.iter().copied().map(RegionId::new).collect();
    let types: Vec<TypeId> = args.types.iter().copied().map(TypeId::new).collect();

    output::header(env!("CARGO_PKG_VERSION"));
    let spinner = output::spinner(&format!("Loading order books for {} regions", regions.len()));
    let window = orders.load_regions(regions.iter().copied(), args.side).await;
    if window.entries == 0 {
        output::spinner_fail(&spinner, "No order books loaded");
    } else {
        output::spinner_success(
            &spinner,
            &format!("{} order books in {} regions", window.entries, window.regions),
        );
    }

    let mut history_stored = 0;
    if !types.is_empty() {
        output::section("History");
        for &region in &regions {
            let bar = output::progress_bar(types.len(), &format!("Region {region}"));
            let report = |done: usize, _total: usize| {
                bar.set_position(u64::try_from(done).unwrap_or(u64::MAX));
            };
            history_stored += history.prefetch(region, &types, Some(&report)).await;
            bar.finish_and_clear();
        }
        output::note(&format!("{history_stored} history series stored"));
    }

    report_window(&window, history_stored);
    window
}

fn report_window(window: &OrderWindow, history_stored: usize) {
    let format_time = |time: Option<chrono::DateTime<chrono::Utc>>| {
        time.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())
    };
    let format_ttl = |ttl: Option<i64>| ttl.map_or_else(|| "-".to_string(), |s| format!("{s}s"));

    if output::is_json() {
        output::json_result(
            "warm",
            json!({
                "regions": window.regions,
                "entries": window.entries,
                "revision": window.revision,
                "min_ttl_secs": window.min_ttl_secs,
                "max_ttl_secs": window.max_ttl_secs,
                "next_expiry": window.next_expiry,
                "last_refresh": window.last_refresh,
                "history_stored": history_stored,
            }),
        );
        return;
    }

    output::section("Freshness");
    output::field("Regions", window.regions);
    output::field("Entries", window.entries);
    output::field("Revision", window.revision);
    output::field("Min TTL", format_ttl(window.min_ttl_secs));
    output::field("Max TTL", format_ttl(window.max_ttl_secs));
    output::field("Next expiry", format_time(window.next_expiry));
    output::field("Last refresh", format_time(window.last_refresh));
}
