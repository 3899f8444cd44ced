//! Read-only routing queries over [`UniverseGraph`].
//!
//! All edges have unit weight, so distance is the number of gate hops.
//! A `min_security` of zero or below disables the security filter; above
//! zero, a location passes only if its security is known and at least
//! `min_security`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use super::id::{LocationId, RegionId};
use super::universe::UniverseGraph;

/// Hop distances keyed by location.
pub type HopMap = HashMap<LocationId, u32>;

impl UniverseGraph {
    fn passes_security(&self, location: LocationId, min_security: f64) -> bool {
        if min_security <= 0.0 {
            return true;
        }
        self.security(location)
            .is_some_and(|security| security >= min_security)
    }

    /// Every location reachable from `origin` within `max_hops` gates.
    ///
    /// The origin is always present at distance 0. Other locations are
    /// only entered when they pass the security filter, so a filtered
    /// location also blocks everything behind it.
    #[must_use]
    pub fn reachable_within(&self, origin: LocationId, max_hops: u32, min_security: f64) -> HopMap {
        let mut distances = HopMap::new();
        distances.insert(origin, 0);

        let mut queue = VecDeque::from([(origin, 0u32)]);
        while let Some((current, hops)) = queue.pop_front() {
            if hops == max_hops {
                continue;
            }
            let next = hops + 1;
            for &neighbor in self.neighbors(current) {
                if distances.contains_key(&neighbor) {
                    continue;
                }
                if !self.passes_security(neighbor, min_security) {
                    continue;
                }
                distances.insert(neighbor, next);
                queue.push_back((neighbor, next));
            }
        }

        distances
    }

    /// Minimum hop count from `origin` to `destination`.
    ///
    /// Returns `None` when no path exists or when either endpoint fails the
    /// security filter.
    #[must_use]
    pub fn shortest_path(
        &self,
        origin: LocationId,
        destination: LocationId,
        min_security: f64,
    ) -> Option<u32> {
        if !self.passes_security(origin, min_security)
            || !self.passes_security(destination, min_security)
        {
            return None;
        }
        if origin == destination {
            return Some(0);
        }

        let mut best: HopMap = HashMap::from([(origin, 0)]);
        let mut heap = BinaryHeap::from([Reverse((0u32, origin))]);

        while let Some(Reverse((hops, current))) = heap.pop() {
            if current == destination {
                return Some(hops);
            }
            if best.get(&current).is_some_and(|&known| hops > known) {
                continue;
            }
            let next = hops + 1;
            for &neighbor in self.neighbors(current) {
                if !self.passes_security(neighbor, min_security) {
                    continue;
                }
                if best.get(&neighbor).map_or(true, |&known| next < known) {
                    best.insert(neighbor, next);
                    heap.push(Reverse((next, neighbor)));
                }
            }
        }

        None
    }

    /// Regions touched by a set of locations. Locations without a region
    /// are skipped.
    #[must_use]
    pub fn regions_of<'a, I>(&self, locations: I) -> HashSet<RegionId>
    where
        I: IntoIterator<Item = &'a LocationId>,
    {
        locations
            .into_iter()
            .filter_map(|&location| self.region(location))
            .collect()
    }

    /// Every location in the given regions, each at distance 0.
    ///
    /// Used to seed whole-region scans rather than radius scans.
    #[must_use]
    pub fn locations_in_regions<'a, I>(&self, regions: I) -> HopMap
    where
        I: IntoIterator<Item = &'a RegionId>,
    {
        regions
            .into_iter()
            .flat_map(|&region| self.region_members(region).iter().copied())
            .map(|location| (location, 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::universe::UniverseBuilder;

    const A: LocationId = LocationId::new(1);
    const B: LocationId = LocationId::new(2);
    const C: LocationId = LocationId::new(3);
    const D: LocationId = LocationId::new(4);

    fn chain(c_security: f64) -> UniverseGraph {
        let mut builder = UniverseBuilder::new();
        builder.connect(A, B).connect(B, C).connect(C, D);
        for (id, security) in [(A, 1.0), (B, 1.0), (C, c_security), (D, 1.0)] {
            builder.set_security(id, security);
            builder.set_region(id, RegionId::new(if id == D { 20 } else { 10 }));
        }
        builder.build()
    }

    #[test]
    fn reachable_within_chain() {
        let graph = chain(1.0);
        let reach = graph.reachable_within(A, 2, 0.0);

        assert_eq!(reach, HashMap::from([(A, 0), (B, 1), (C, 2)]));
    }

    #[test]
    fn zero_hops_returns_only_origin() {
        let graph = chain(1.0);

        assert_eq!(graph.reachable_within(B, 0, 0.5), HashMap::from([(B, 0)]));
        // Unknown origins still report themselves.
        let unknown = LocationId::new(99);
        assert_eq!(
            graph.reachable_within(unknown, 5, 0.0),
            HashMap::from([(unknown, 0)])
        );
    }

    #[test]
    fn low_security_blocks_expansion() {
        let graph = chain(-1.0);
        let reach = graph.reachable_within(A, 5, 0.45);

        assert_eq!(reach, HashMap::from([(A, 0), (B, 1)]));
    }

    #[test]
    fn unknown_security_is_excluded_when_filtering() {
        let mut builder = UniverseBuilder::new();
        builder.connect(A, B);
        builder.set_security(A, 1.0);
        let graph = builder.build();

        assert_eq!(graph.reachable_within(A, 1, 0.5).len(), 1);
        assert_eq!(graph.reachable_within(A, 1, 0.0).len(), 2);
    }

    #[test]
    fn shortest_path_chain() {
        let graph = chain(1.0);

        assert_eq!(graph.shortest_path(A, D, 0.0), Some(3));
        assert_eq!(graph.shortest_path(D, A, 0.45), Some(3));
        assert_eq!(graph.shortest_path(C, C, 0.0), Some(0));
    }

    #[test]
    fn shortest_path_respects_security() {
        let graph = chain(-1.0);

        assert_eq!(graph.shortest_path(A, D, 0.0), Some(3));
        assert_eq!(graph.shortest_path(A, D, 0.45), None);
        // Endpoint failing the filter is unreachable even from itself.
        assert_eq!(graph.shortest_path(C, C, 0.45), None);
    }

    #[test]
    fn shortest_path_prefers_fewer_hops() {
        let mut builder = UniverseBuilder::new();
        builder.connect(A, B).connect(B, C).connect(C, D).connect(A, D);
        let graph = builder.build();

        assert_eq!(graph.shortest_path(A, C, 0.0), Some(2));
        assert_eq!(graph.shortest_path(B, D, 0.0), Some(2));
    }

    #[test]
    fn shortest_path_detour_around_low_security() {
        let mut builder = UniverseBuilder::new();
        let e = LocationId::new(5);
        builder.connect(A, B).connect(B, D).connect(A, C).connect(C, e).connect(e, D);
        for id in [A, C, D, e] {
            builder.set_security(id, 0.8);
        }
        builder.set_security(B, 0.1);
        let graph = builder.build();

        assert_eq!(graph.shortest_path(A, D, 0.0), Some(2));
        assert_eq!(graph.shortest_path(A, D, 0.5), Some(3));
    }

    #[test]
    fn raising_min_security_is_monotonic() {
        let graph = chain(0.3);
        let mut previous_size = usize::MAX;
        let mut previous_path = 0;

        for threshold in [0.0, 0.2, 0.3, 0.5, 1.0, 1.5] {
            let size = graph.reachable_within(A, 10, threshold).len();
            assert!(size <= previous_size, "threshold {threshold}");
            previous_size = size;

            let path = graph.shortest_path(A, D, threshold).unwrap_or(u32::MAX);
            assert!(path >= previous_path, "threshold {threshold}");
            previous_path = path;
        }
    }

    #[test]
    fn region_projections() {
        let graph = chain(1.0);
        let regions = graph.regions_of(&[A, D, LocationId::new(77)]);

        assert_eq!(regions, HashSet::from([RegionId::new(10), RegionId::new(20)]));

        let seeded = graph.locations_in_regions(&[RegionId::new(10)]);
        assert_eq!(seeded, HashMap::from([(A, 0), (B, 0), (C, 0)]));
    }
}
