//! Handler for the `reach` command.

use serde_json::json;

use super::command::ReachArgs;
use super::output;
use crate::domain::{LocationId, UniverseGraph};

/// One reachable system, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachRow {
    pub id: LocationId,
    pub hops: u32,
    pub name: Option<String>,
    pub security: Option<f64>,
}

/// Reachable systems ordered by hop count, then id.
#[must_use]
pub fn rows(universe: &UniverseGraph, args: &ReachArgs) -> Vec<ReachRow> {
    let origin = LocationId::new(args.origin);
    let mut rows: Vec<ReachRow> = universe
        .reachable_within(origin, args.jumps, args.min_security)
        .into_iter()
        .map(|(id, hops)| ReachRow {
            id,
            hops,
            name: universe.name(id).map(str::to_string),
            security: universe.security(id),
        })
        .collect();
    rows.sort_by_key(|row| (row.hops, row.id));
    rows
}

/// Execute the reach command.
pub fn execute(universe: &UniverseGraph, args: &ReachArgs) {
    let rows = rows(universe, args);

    if output::is_json() {
        let systems: Vec<_> = rows
            .iter()
            .map(|row| {
                json!({
                    "id": row.id,
                    "hops": row.hops,
                    "name": row.name,
                    "security": row.security,
                })
            })
            .collect();
        output::json_result(
            "reach",
            json!({
                "origin": args.origin,
                "jumps": args.jumps,
                "min_security": args.min_security,
                "systems": systems,
            }),
        );
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Origin", args.origin);
    output::field("Jumps", args.jumps);
    output::field("Min security", args.min_security);
    output::section(&format!("{} systems", rows.len()));
    for row in &rows {
        let name = row.name.as_deref().unwrap_or("?");
        let security = row
            .security
            .map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"));
        println!(
            "  {:>3}  {:<12} {} {}",
            row.hops,
            row.id.get(),
            output::highlight(name),
            output::muted(security)
        );
    }
}
