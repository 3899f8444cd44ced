//! Handler for the `route` command.

use serde_json::json;

use super::command::RouteArgs;
use super::output;
use crate::domain::{LocationId, UniverseGraph};

/// Execute the route command. Returns the hop count, if any.
pub fn execute(universe: &UniverseGraph, args: &RouteArgs) -> Option<u32> {
    let from = LocationId::new(args.from);
    let to = LocationId::new(args.to);
    let hops = universe.shortest_path(from, to, args.min_security);

    if output::is_json() {
        output::json_result(
            "route",
            json!({
                "from": args.from,
                "to": args.to,
                "min_security": args.min_security,
                "hops": hops,
            }),
        );
        return hops;
    }

    let label = |id: LocationId| {
        universe
            .name(id)
            .map_or_else(|| id.to_string(), |name| format!("{name} ({id})"))
    };

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("From", label(from));
    output::field("To", label(to));
    output::field("Min security", args.min_security);
    match hops {
        Some(hops) => output::success(&format!("{} jumps", output::highlight(hops))),
        None => output::warning("No route satisfies the security filter"),
    }
    hops
}
