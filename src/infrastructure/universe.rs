//! Static universe data loader.
//!
//! The file lists every system once and every gate pair once:
//!
//! ```json
//! {
//!   "systems": [{ "id": 30000142, "name": "Jita", "region_id": 10000002, "security": 0.95 }],
//!   "gates": [[30000142, 30000144]]
//! }
//! ```
//!
//! Gates are undirected in the file and inserted in both directions.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{LocationId, RegionId, UniverseBuilder, UniverseGraph};
use crate::error::UniverseError;

#[derive(Debug, Deserialize)]
struct SystemRecord {
    id: LocationId,
    #[serde(default)]
    name: Option<String>,
    region_id: RegionId,
    #[serde(default)]
    security: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UniverseFile {
    #[serde(default)]
    systems: Vec<SystemRecord>,
    #[serde(default)]
    gates: Vec<(LocationId, LocationId)>,
}

/// Build a graph from the JSON document in `content`.
pub fn parse_universe(content: &str) -> Result<UniverseGraph, UniverseError> {
    let file: UniverseFile = serde_json::from_str(content).map_err(UniverseError::Parse)?;

    let mut builder = UniverseBuilder::new();
    for system in &file.systems {
        builder.set_region(system.id, system.region_id);
        if let Some(name) = &system.name {
            builder.set_name(system.id, name.clone());
        }
        if let Some(security) = system.security {
            builder.set_security(system.id, security);
        }
    }
    for &(a, b) in &file.gates {
        builder.connect(a, b);
    }

    let graph = builder.build();
    info!(
        locations = graph.location_count(),
        gates = graph.gate_count(),
        "Universe loaded"
    );
    Ok(graph)
}

/// Read and build the universe file at `path`.
pub fn load_universe<P: AsRef<Path>>(path: P) -> Result<UniverseGraph, UniverseError> {
    let content = std::fs::read_to_string(path).map_err(UniverseError::Read)?;
    parse_universe(&content)
}
