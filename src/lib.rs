//! Recent earthquakes and tectonic plate boundaries on a Leaflet map.
//!
//! [`pipeline::render_map`] fetches the earthquake feed, builds the marker
//! layer, then fetches the boundary feed and composes a [`compose::MapView`].
//! [`render`] turns that into an HTML page and [`server`] serves it.

pub mod types;
pub mod config;
pub mod classify;
pub mod error;
pub mod feed;
pub mod layers;
pub mod compose;
pub mod pipeline;
pub mod render;
pub mod server;

#[cfg(test)]
mod fixtures;
