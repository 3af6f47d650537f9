use itertools::Itertools;
use log::{info, trace, warn};
use rayon::prelude::*;

use crate::distance::haversine;
use crate::loading::GraphConfig;
use crate::model::{City, CityGraph};
use crate::{Error, Kilometers};

/// Build the proximity graph for a set of cities.
///
/// Every city is connected to its closest neighbors within
/// `config.radius_km`, at most `config.neighbor_cap` of them, ranked
/// ascending by distance with ties broken by input order. A city with no
/// neighbor inside the radius falls back to its globally nearest cities, so
/// every node gets at least one edge unless the set has a single city or
/// its coordinates cannot be measured.
///
/// The pairwise distance phase is the dominant cost, O(N²) evaluations with
/// an O(N log K) partial sort per city. Each city's neighbor list is
/// computed independently in parallel; edge insertion happens in a single
/// serial merge, so rebuilding the same input always yields the same graph.
pub fn build_proximity_graph(cities: &[City], config: &GraphConfig) -> Result<CityGraph, Error> {
    let mut graph = CityGraph::with_capacity(cities.len(), cities.len() * config.neighbor_cap);
    let mut nodes = Vec::with_capacity(cities.len());
    for city in cities {
        if graph.node(&city.name).is_some() {
            return Err(Error::InvalidData(format!(
                "duplicate city name: {}",
                city.name
            )));
        }
        nodes.push(graph.add_city(city.clone()));
    }

    let neighbor_lists: Vec<Vec<(usize, Kilometers)>> = (0..cities.len())
        .into_par_iter()
        .map(|source| select_neighbors(cities, source, config))
        .collect();

    // Serial merge; update_edge keeps the unordered pair unique even when
    // both endpoints discovered each other.
    for (source, neighbors) in neighbor_lists.into_iter().enumerate() {
        for (target, distance_km) in neighbors {
            graph.connect(nodes[source], nodes[target], distance_km);
        }
    }

    info!(
        "Built proximity graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Closest in-radius candidates for one city, capped at `neighbor_cap` and
/// sorted ascending by distance. Falls back to the globally nearest cities
/// when nothing lies within the radius.
fn select_neighbors(
    cities: &[City],
    source: usize,
    config: &GraphConfig,
) -> Vec<(usize, Kilometers)> {
    let origin = &cities[source].geometry;

    let mut measured = Vec::with_capacity(cities.len().saturating_sub(1));
    for (target, city) in cities.iter().enumerate() {
        if target == source {
            continue;
        }
        match haversine(origin, &city.geometry) {
            Some(distance) => measured.push((target, distance)),
            None => trace!(
                "Unmeasurable distance {} -> {}, candidate skipped",
                cities[source].name,
                city.name
            ),
        }
    }

    if measured.is_empty() && cities.len() > 1 {
        warn!(
            "City {} has no measurable neighbors and stays isolated",
            cities[source].name
        );
        return Vec::new();
    }

    // Ties resolve to the earlier input position.
    let ascending = |a: &(usize, Kilometers), b: &(usize, Kilometers)| {
        a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
    };

    let within: Vec<(usize, Kilometers)> = measured
        .iter()
        .copied()
        .filter(|&(_, distance)| distance < config.radius_km)
        .k_smallest_by(config.neighbor_cap, ascending)
        .collect();
    if !within.is_empty() {
        return within;
    }

    // Nothing within radius: connect to the nearest cities regardless.
    measured
        .into_iter()
        .k_smallest_by(config.neighbor_cap, ascending)
        .collect()
}
