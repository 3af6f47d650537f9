//! Data model for the proximity routing graph.

pub mod components;
pub mod graph;

pub use components::City;
pub use graph::CityGraph;
