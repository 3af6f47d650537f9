//! Core entities of the routing model.

use geo::Point;

/// A named geographic location.
///
/// Identity is the name; coordinates are immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// Unique name of the location.
    pub name: String,
    /// Location as (longitude, latitude) in decimal degrees.
    pub geometry: Point<f64>,
}

impl City {
    pub fn new(name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            name: name.into(),
            geometry: Point::new(lon, lat),
        }
    }
}
