//! Graph construction and cache orchestration.

mod builder;
mod config;

pub use builder::build_proximity_graph;
pub use config::GraphConfig;

use log::info;

use crate::Error;
use crate::cache::{GraphCache, fingerprint};
use crate::model::{City, CityGraph};

/// Load the proximity graph from the configured cache, or build it.
///
/// A cache miss (absent file, older schema, or a fingerprint that no longer
/// matches `cities`) triggers a full rebuild followed by a write-back. A
/// cache file that is present but undecodable is a fatal error; silently
/// discarding it could mask a storage problem.
pub fn load_or_build_graph(cities: &[City], config: &GraphConfig) -> Result<CityGraph, Error> {
    let Some(path) = &config.cache_path else {
        return build_proximity_graph(cities, config);
    };

    let cache = GraphCache::new(path);
    let input_fingerprint = fingerprint(cities);
    if let Some(graph) = cache.load(input_fingerprint)? {
        info!("Loaded cached graph from {}", path.display());
        return Ok(graph);
    }

    info!("Graph cache miss, building from {} cities", cities.len());
    let graph = build_proximity_graph(cities, config)?;
    cache.store(&graph, input_fingerprint)?;
    Ok(graph)
}
