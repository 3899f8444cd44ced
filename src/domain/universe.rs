//! Static universe graph: locations, their attributes and the gates between them.
//!
//! The graph is assembled once through [`UniverseBuilder`] and then frozen
//! into an immutable [`UniverseGraph`] that can be shared across tasks
//! without synchronization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::{LocationId, RegionId};

/// A location with its static attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: Option<String>,
    pub region: Option<RegionId>,
    /// Continuous security status; non-positive means null-security space.
    pub security: Option<f64>,
}

#[derive(Debug, Clone, Default)]
struct Attributes {
    name: Option<String>,
    region: Option<RegionId>,
    security: Option<f64>,
}

/// Mutable, single-threaded assembly stage of the universe graph.
///
/// All setters are additive: gates are only ever appended and a location's
/// security can be set once.
#[derive(Debug, Default)]
pub struct UniverseBuilder {
    adjacency: HashMap<LocationId, Vec<LocationId>>,
    attributes: HashMap<LocationId, Attributes>,
}

impl UniverseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directed edge `from -> to`. Repeated edges are ignored.
    pub fn add_gate(&mut self, from: LocationId, to: LocationId) -> &mut Self {
        let neighbors = self.adjacency.entry(from).or_default();
        if !neighbors.contains(&to) {
            neighbors.push(to);
        }
        self
    }

    /// Record an undirected connection by inserting both directions.
    pub fn connect(&mut self, a: LocationId, b: LocationId) -> &mut Self {
        self.add_gate(a, b).add_gate(b, a)
    }

    /// Associate a location with its region.
    pub fn set_region(&mut self, location: LocationId, region: RegionId) -> &mut Self {
        self.attributes.entry(location).or_default().region = Some(region);
        self
    }

    /// Set a location's display name.
    pub fn set_name(&mut self, location: LocationId, name: impl Into<String>) -> &mut Self {
        self.attributes.entry(location).or_default().name = Some(name.into());
        self
    }

    /// Set a location's security status.
    ///
    /// Returns `false` and leaves the existing value in place if the
    /// location already has one.
    pub fn set_security(&mut self, location: LocationId, security: f64) -> bool {
        let attributes = self.attributes.entry(location).or_default();
        if attributes.security.is_some() {
            return false;
        }
        attributes.security = Some(security);
        true
    }

    /// Freeze the builder into a read-only graph.
    #[must_use]
    pub fn build(self) -> UniverseGraph {
        let mut by_region: HashMap<RegionId, Vec<LocationId>> = HashMap::new();
        for (id, attributes) in &self.attributes {
            if let Some(region) = attributes.region {
                by_region.entry(region).or_default().push(*id);
            }
        }
        for members in by_region.values_mut() {
            members.sort_unstable();
        }

        UniverseGraph {
            adjacency: self.adjacency,
            attributes: self.attributes,
            by_region,
        }
    }
}

/// Immutable universe graph.
#[derive(Debug, Default)]
pub struct UniverseGraph {
    adjacency: HashMap<LocationId, Vec<LocationId>>,
    attributes: HashMap<LocationId, Attributes>,
    by_region: HashMap<RegionId, Vec<LocationId>>,
}

impl UniverseGraph {
    /// Outgoing neighbors of `location`; empty for unknown ids.
    #[must_use]
    pub fn neighbors(&self, location: LocationId) -> &[LocationId] {
        self.adjacency.get(&location).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn region(&self, location: LocationId) -> Option<RegionId> {
        self.attributes.get(&location).and_then(|a| a.region)
    }

    #[must_use]
    pub fn security(&self, location: LocationId) -> Option<f64> {
        self.attributes.get(&location).and_then(|a| a.security)
    }

    #[must_use]
    pub fn name(&self, location: LocationId) -> Option<&str> {
        self.attributes
            .get(&location)
            .and_then(|a| a.name.as_deref())
    }

    /// Full attribute record, if anything is known about `location`.
    #[must_use]
    pub fn location(&self, location: LocationId) -> Option<Location> {
        let attributes = self.attributes.get(&location)?;
        Some(Location {
            id: location,
            name: attributes.name.clone(),
            region: attributes.region,
            security: attributes.security,
        })
    }

    /// Locations assigned to `region`, in ascending id order.
    #[must_use]
    pub fn region_members(&self, region: RegionId) -> &[LocationId] {
        self.by_region.get(&region).map_or(&[], Vec::as_slice)
    }

    /// Number of locations with attributes or outgoing gates.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.adjacency
            .keys()
            .chain(self.attributes.keys())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Number of directed edges.
    #[must_use]
    pub fn gate_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: u64) -> LocationId {
        LocationId::new(id)
    }

    #[test]
    fn connect_inserts_both_directions() {
        let mut builder = UniverseBuilder::new();
        builder.connect(loc(1), loc(2));
        let graph = builder.build();

        assert_eq!(graph.neighbors(loc(1)), &[loc(2)]);
        assert_eq!(graph.neighbors(loc(2)), &[loc(1)]);
        assert_eq!(graph.gate_count(), 2);
    }

    #[test]
    fn duplicate_gates_are_ignored() {
        let mut builder = UniverseBuilder::new();
        builder.connect(loc(1), loc(2)).connect(loc(2), loc(1));
        let graph = builder.build();

        assert_eq!(graph.gate_count(), 2);
    }

    #[test]
    fn security_is_set_once() {
        let mut builder = UniverseBuilder::new();
        assert!(builder.set_security(loc(1), 0.9));
        assert!(!builder.set_security(loc(1), -0.2));
        let graph = builder.build();

        assert_eq!(graph.security(loc(1)), Some(0.9));
    }

    #[test]
    fn unknown_location_has_empty_adjacency() {
        let graph = UniverseBuilder::new().build();

        assert!(graph.neighbors(loc(42)).is_empty());
        assert!(graph.location(loc(42)).is_none());
        assert_eq!(graph.region(loc(42)), None);
    }

    #[test]
    fn region_members_are_indexed() {
        let mut builder = UniverseBuilder::new();
        builder
            .set_region(loc(3), RegionId::new(10))
            .set_region(loc(1), RegionId::new(10))
            .set_region(loc(2), RegionId::new(20))
            .set_name(loc(1), "Jita");
        let graph = builder.build();

        assert_eq!(graph.region_members(RegionId::new(10)), &[loc(1), loc(3)]);
        assert_eq!(graph.name(loc(1)), Some("Jita"));
        assert_eq!(graph.location_count(), 3);
    }
}
