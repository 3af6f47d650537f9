//! Minimum-distance routing between named geographic points.
//!
//! The crate builds a sparse proximity graph over a set of named cities,
//! with great-circle distance as edge weight, persists the built graph in
//! an on-disk cache, and answers point-to-point queries with an A* search
//! whose heuristic is the great-circle distance to the goal.
//!
//! Parsing of geospatial input files and rendering of computed routes are
//! left to the caller: the crate consumes an already-parsed `&[City]` and
//! produces `Route` values whose city names resolve against the original
//! collection.

pub mod cache;
pub mod distance;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

pub use crate::cache::GraphCache;
pub use crate::loading::{GraphConfig, build_proximity_graph, load_or_build_graph};
pub use crate::model::{City, CityGraph};
pub use crate::routing::{Route, RouteSearch, find_route};

/// Distance unit used for edge weights and route lengths.
pub type Kilometers = f64;
