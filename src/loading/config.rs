use std::path::PathBuf;

use crate::Kilometers;

/// Configuration for building (or reloading) a proximity graph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Connect cities closer than this many kilometers.
    pub radius_km: Kilometers,
    /// Keep at most this many closest neighbors per city.
    pub neighbor_cap: usize,
    /// Optional on-disk cache for the built graph.
    pub cache_path: Option<PathBuf>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            radius_km: 20.0,
            neighbor_cap: 10,
            cache_path: None,
        }
    }
}
