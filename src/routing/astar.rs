use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::Kilometers;
use crate::distance::haversine;
use crate::model::CityGraph;

use super::Route;

/// Frontier entry for a min-heap: lowest f-score first, ties broken by
/// lower accumulated cost, then by lexicographic rank of the city name, so
/// the expansion order (and therefore the returned route) is deterministic.
#[derive(Copy, Clone, PartialEq)]
struct State {
    score: Kilometers,
    cost: Kilometers,
    rank: u32,
    node: NodeIndex,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap ordering (reversed from standard Rust BinaryHeap)
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search between two graph nodes. Returns `None` when no path exists.
///
/// The heuristic is the great-circle distance to the goal. Any real path is
/// a polyline whose length can never undercut the straight-line distance,
/// so the heuristic is admissible and the first arrival at the goal is the
/// minimum-weight path.
pub(super) fn shortest_path(
    graph: &CityGraph,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<Route> {
    if start == end {
        return Some(Route {
            cities: vec![graph.city(start).name.clone()],
            distance_km: 0.0,
        });
    }

    let ranks = name_ranks(graph);
    let goal = graph.city(end).geometry;
    // A malformed coordinate degrades the estimate to zero, which keeps it
    // admissible; the search then behaves like plain Dijkstra.
    let estimate =
        |node: NodeIndex| haversine(&graph.city(node).geometry, &goal).unwrap_or(0.0);

    let mut best: HashMap<NodeIndex, Kilometers> = HashMap::new();
    let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut heap = BinaryHeap::new();

    best.insert(start, 0.0);
    heap.push(State {
        score: estimate(start),
        cost: 0.0,
        rank: ranks[start.index()],
        node: start,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if node == end {
            return Some(reconstruct(graph, &came_from, start, end));
        }

        // Skip entries superseded by a cheaper path
        if best.get(&node).is_some_and(|&known| cost > known) {
            continue;
        }

        for edge in graph.graph().edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight();

            let improved = match best.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    true
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        true
                    } else {
                        false
                    }
                }
            };
            if improved {
                came_from.insert(next, node);
                heap.push(State {
                    score: next_cost + estimate(next),
                    cost: next_cost,
                    rank: ranks[next.index()],
                    node: next,
                });
            }
        }
    }

    None
}

/// Rank of each node in lexicographic name order, used for tie-breaks
/// (heap states cannot reach back into the graph from `Ord`).
fn name_ranks(graph: &CityGraph) -> Vec<u32> {
    let mut order: Vec<NodeIndex> = graph.graph().node_indices().collect();
    order.sort_by(|a, b| graph.city(*a).name.cmp(&graph.city(*b).name));

    let mut ranks = vec![0u32; order.len()];
    for (rank, node) in order.into_iter().enumerate() {
        ranks[node.index()] = rank as u32;
    }
    ranks
}

fn reconstruct(
    graph: &CityGraph,
    came_from: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    end: NodeIndex,
) -> Route {
    let mut nodes = vec![end];
    let mut current = end;
    while current != start {
        current = came_from[&current];
        nodes.push(current);
    }
    nodes.reverse();

    // The reported length is the literal sum of the traversed edge weights.
    let distance_km = nodes
        .windows(2)
        .map(|pair| graph.edge_weight(pair[0], pair[1]).unwrap_or(0.0))
        .sum();

    Route {
        cities: nodes
            .into_iter()
            .map(|node| graph.city(node).name.clone())
            .collect(),
        distance_km,
    }
}
