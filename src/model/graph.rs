use geo::Point;
use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::City;
use crate::Kilometers;

/// Proximity graph over named cities.
///
/// Nodes carry the full `City`; edge weights are great-circle distances in
/// kilometers. The graph is undirected and may contain several disconnected
/// components. It is built once and treated as read-mostly afterwards; one
/// graph can serve many route searches.
#[derive(Debug, Default)]
pub struct CityGraph {
    graph: UnGraph<City, Kilometers>,
    index: HashMap<String, NodeIndex>,
}

impl CityGraph {
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
        }
    }

    /// Insert a city, returning its node index. The name must be unique.
    pub(crate) fn add_city(&mut self, city: City) -> NodeIndex {
        let name = city.name.clone();
        let node = self.graph.add_node(city);
        self.index.insert(name, node);
        node
    }

    /// Insert or overwrite the edge between two cities.
    pub(crate) fn connect(&mut self, a: NodeIndex, b: NodeIndex, distance_km: Kilometers) {
        self.graph.update_edge(a, b, distance_km);
    }

    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn city(&self, node: NodeIndex) -> &City {
        &self.graph[node]
    }

    /// Coordinate lookup for renderers.
    pub fn position_of(&self, name: &str) -> Option<Point<f64>> {
        self.node(name).map(|node| self.graph[node].geometry)
    }

    pub fn edge_weight(&self, a: NodeIndex, b: NodeIndex) -> Option<Kilometers> {
        self.graph.find_edge(a, b).map(|edge| self.graph[edge])
    }

    /// Cities in node-index order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.graph.node_weights()
    }

    /// All edges as (source name, target name, weight in kilometers).
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Kilometers)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
                *edge.weight(),
            )
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn graph(&self) -> &UnGraph<City, Kilometers> {
        &self.graph
    }
}
