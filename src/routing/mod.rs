//! Heuristic shortest-path search over the proximity graph.

mod astar;

use std::time::{Duration, Instant};

use log::info;

use crate::Kilometers;
use crate::model::CityGraph;

/// An ordered route between two cities, start and end inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// City names along the route; consecutive pairs are graph edges.
    pub cities: Vec<String>,
    /// Literal sum of the traversed edge weights.
    pub distance_km: Kilometers,
}

/// Outcome of a single search request.
#[derive(Debug, Clone)]
pub struct RouteSearch {
    /// The minimum-distance route, or `None` when either endpoint is
    /// unknown or the two lie in disconnected components.
    pub route: Option<Route>,
    /// Wall-clock duration of the search itself.
    pub elapsed: Duration,
}

/// Find the minimum-distance route between two named cities.
///
/// The search is A* with the great-circle distance to the goal as
/// heuristic; edge weights are themselves great-circle distances, so the
/// heuristic never overestimates and the returned route is optimal.
/// Missing identifiers and unreachable endpoints are normal outcomes
/// reported as `route: None`, not errors.
pub fn find_route(graph: &CityGraph, start: &str, end: &str) -> RouteSearch {
    let started = Instant::now();

    let route = match (graph.node(start), graph.node(end)) {
        (Some(source), Some(target)) => {
            let route = astar::shortest_path(graph, source, target);
            if route.is_none() {
                info!("No path found between {start} and {end}");
            }
            route
        }
        _ => {
            info!("Unknown city in request: {start} -> {end}");
            None
        }
    };

    RouteSearch {
        route,
        elapsed: started.elapsed(),
    }
}
