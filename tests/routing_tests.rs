//! Reachability and shortest-path behaviour over whole graphs.

use std::collections::{HashMap, VecDeque};

use tradelane::domain::{LocationId, RegionId, UniverseBuilder, UniverseGraph};
use tradelane::testkit::universe::{abcd, chain, loc};

/// A small two-region map with a low-security shortcut:
///
/// ```text
/// 1 - 2 - 3 - 4 - 5        region 10
///  \             /
///   6 --------- 7          region 20, security 0.1
/// ```
fn shortcut_map() -> UniverseGraph {
    let mut builder = UniverseBuilder::new();
    for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 5), (1, 6), (6, 7), (7, 5)] {
        builder.connect(loc(a), loc(b));
    }
    for id in 1..=5 {
        builder.set_security(loc(id), 0.9);
        builder.set_region(loc(id), RegionId::new(10));
    }
    for id in [6, 7] {
        builder.set_security(loc(id), 0.1);
        builder.set_region(loc(id), RegionId::new(20));
    }
    builder.build()
}

/// Unfiltered breadth-first distances, computed independently.
fn true_distances(graph: &UniverseGraph, origin: LocationId) -> HashMap<LocationId, u32> {
    let mut distances = HashMap::from([(origin, 0)]);
    let mut queue = VecDeque::from([origin]);
    while let Some(current) = queue.pop_front() {
        let next = distances[&current] + 1;
        for &neighbor in graph.neighbors(current) {
            distances.entry(neighbor).or_insert_with(|| {
                queue.push_back(neighbor);
                next
            });
        }
    }
    distances
}

#[test]
fn chain_scenario() {
    let graph = abcd(1.0);

    assert_eq!(
        graph.reachable_within(loc(1), 2, 0.0),
        HashMap::from([(loc(1), 0), (loc(2), 1), (loc(3), 2)])
    );
    assert_eq!(graph.shortest_path(loc(1), loc(4), 0.0), Some(3));
    assert_eq!(abcd(-1.0).shortest_path(loc(1), loc(4), 0.45), None);
}

#[test]
fn zero_hops_is_origin_only() {
    for graph in [abcd(1.0), shortcut_map()] {
        for origin in [loc(1), loc(4), loc(999)] {
            assert_eq!(
                graph.reachable_within(origin, 0, 0.0),
                HashMap::from([(origin, 0)])
            );
        }
    }
}

#[test]
fn unfiltered_reach_is_sound_and_complete() {
    let graph = shortcut_map();
    let truth = true_distances(&graph, loc(1));

    for max_hops in 0..=5 {
        let reached = graph.reachable_within(loc(1), max_hops, 0.0);
        let expected: HashMap<_, _> = truth
            .iter()
            .filter(|&(_, &hops)| hops <= max_hops)
            .map(|(&id, &hops)| (id, hops))
            .collect();
        assert_eq!(reached, expected, "max_hops = {max_hops}");
    }
}

#[test]
fn security_filter_forces_the_long_way() {
    let graph = shortcut_map();

    assert_eq!(graph.shortest_path(loc(1), loc(5), 0.0), Some(3));
    assert_eq!(graph.shortest_path(loc(1), loc(5), 0.5), Some(4));

    let secure = graph.reachable_within(loc(1), 3, 0.5);
    assert!(!secure.contains_key(&loc(6)));
    assert!(!secure.contains_key(&loc(5)));
    assert_eq!(secure.get(&loc(4)), Some(&3));
}

#[test]
fn raising_min_security_is_monotone() {
    let graph = shortcut_map();
    let thresholds = [0.0, 0.05, 0.1, 0.5, 0.9, 0.95];

    for origin in 1..=7 {
        let mut previous_size = usize::MAX;
        let mut previous_paths: HashMap<u64, Option<u32>> = HashMap::new();

        for &threshold in &thresholds {
            let size = graph.reachable_within(loc(origin), 10, threshold).len();
            assert!(size <= previous_size, "reach grew at {threshold} from {origin}");
            previous_size = size;

            for dest in 1..=7 {
                let path = graph.shortest_path(loc(origin), loc(dest), threshold);
                if let Some(Some(before)) = previous_paths.get(&dest) {
                    if let Some(after) = path {
                        assert!(after >= *before, "path shrank at {threshold}");
                    }
                } else if let Some(None) = previous_paths.get(&dest) {
                    assert_eq!(path, None, "path reappeared at {threshold}");
                }
                previous_paths.insert(dest, path);
            }
        }
    }
}

#[test]
fn endpoints_must_pass_the_filter() {
    let graph = shortcut_map();

    assert_eq!(graph.shortest_path(loc(6), loc(6), 0.0), Some(0));
    assert_eq!(graph.shortest_path(loc(6), loc(6), 0.5), None);
    assert_eq!(graph.shortest_path(loc(1), loc(7), 0.5), None);
    assert_eq!(graph.shortest_path(loc(7), loc(1), 0.5), None);
}

#[test]
fn unknown_locations_are_isolated_not_errors() {
    let graph = abcd(1.0);

    assert!(graph.neighbors(loc(42)).is_empty());
    assert_eq!(graph.shortest_path(loc(1), loc(42), 0.0), None);
    assert_eq!(graph.shortest_path(loc(42), loc(42), 0.0), Some(0));
}

#[test]
fn region_projections() {
    let graph = shortcut_map();

    let reached = graph.reachable_within(loc(1), 1, 0.0);
    let regions = graph.regions_of(reached.keys());
    assert_eq!(regions.len(), 2);
    assert!(regions.contains(&RegionId::new(20)));

    let seeds = graph.locations_in_regions([RegionId::new(20)].iter());
    assert_eq!(seeds, HashMap::from([(loc(6), 0), (loc(7), 0)]));
}

#[test]
fn long_chain_hop_counts() {
    let nodes: Vec<(u64, f64)> = (1..=50).map(|id| (id, 1.0)).collect();
    let graph = chain(RegionId::new(1), &nodes);

    assert_eq!(graph.shortest_path(loc(1), loc(50), 0.0), Some(49));
    assert_eq!(graph.reachable_within(loc(25), 5, 0.0).len(), 11);
}
