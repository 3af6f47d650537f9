// Re-export key components
pub use crate::cache::{GraphCache, fingerprint};
pub use crate::loading::{GraphConfig, build_proximity_graph, load_or_build_graph};
pub use crate::model::{City, CityGraph};
pub use crate::routing::{Route, RouteSearch, find_route};

pub use crate::Error;
pub use crate::Kilometers;
