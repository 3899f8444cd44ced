//! Small universe graphs for routing tests.

use crate::domain::{LocationId, RegionId, UniverseBuilder, UniverseGraph};

/// Shorthand for a [`LocationId`].
pub fn loc(id: u64) -> LocationId {
    LocationId::new(id)
}

/// A linear chain of locations, each with the given security, all in
/// `region`. Consecutive locations are connected both ways.
pub fn chain(region: RegionId, nodes: &[(u64, f64)]) -> UniverseGraph {
    let mut builder = UniverseBuilder::new();
    for pair in nodes.windows(2) {
        builder.connect(loc(pair[0].0), loc(pair[1].0));
    }
    for &(id, security) in nodes {
        builder.set_security(loc(id), security);
        builder.set_region(loc(id), region);
        builder.set_name(loc(id), format!("System {id}"));
    }
    builder.build()
}

/// Chain A(1)–B(2)–C(3)–D(4), security 1.0 except C.
pub fn abcd(c_security: f64) -> UniverseGraph {
    chain(
        RegionId::new(10_000_002),
        &[(1, 1.0), (2, 1.0), (3, c_security), (4, 1.0)],
    )
}
