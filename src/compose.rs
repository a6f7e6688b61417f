//! Assembles layers and controls into the initial map view.
//!
//! The result is a plain serializable description; the page script turns it
//! into Leaflet objects one-to-one.

use crate::classify::{classify, LEGEND_GRADES};
use crate::config::{AppConfig, TileConfig};
use crate::layers::{BoundaryLayer, MarkerLayer};
use serde::Serialize;

pub const STREET_MAP: &str = "Street Map";
pub const DARK_MAP: &str = "Dark Map";
pub const EARTHQUAKE_OVERLAY: &str = "Earthquakes";
pub const BOUNDARY_OVERLAY: &str = "Plate Boundaries";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseLayer {
    pub name: String,
    pub active: bool,
    pub tiles: TileLayer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayLayer {
    Markers(MarkerLayer),
    Boundaries(BoundaryLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    pub visible: bool,
    pub layer: OverlayLayer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: ControlPosition,
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub container_id: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub base_layers: Vec<BaseLayer>,
    pub overlays: Vec<Overlay>,
    pub layer_control: LayerControl,
    pub legend: Legend,
}

impl MapView {
    pub fn active_base_layer(&self) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|b| b.active)
    }

    pub fn overlay(&self, name: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == name)
    }

    pub fn marker_count(&self) -> usize {
        self.overlays
            .iter()
            .map(|o| match &o.layer {
                OverlayLayer::Markers(m) => m.len(),
                OverlayLayer::Boundaries(_) => 0,
            })
            .sum()
    }
}

/// Fills `{id}` and `{accessToken}`; `{z}/{x}/{y}` stay for Leaflet.
pub fn tile_url(template: &str, style_id: &str, access_token: &str) -> String {
    template
        .replace("{id}", style_id)
        .replace("{accessToken}", access_token)
}

pub fn build_base_layers(tiles: &TileConfig) -> Vec<BaseLayer> {
    let token = tiles.resolve_access_token();
    let layer = |name: &str, style: &str, active: bool| BaseLayer {
        name: name.to_string(),
        active,
        tiles: TileLayer {
            url: tile_url(&tiles.url_template, style, &token),
            attribution: tiles.attribution.clone(),
            max_zoom: tiles.max_zoom,
        },
    };

    vec![
        layer(STREET_MAP, &tiles.street_style, false),
        layer(DARK_MAP, &tiles.dark_style, true),
    ]
}

pub fn build_legend() -> Legend {
    Legend {
        position: ControlPosition::BottomRight,
        title: "Legend".to_string(),
        entries: LEGEND_GRADES
            .iter()
            .map(|(label, grade)| LegendEntry {
                label: label.to_string(),
                color: classify(*grade),
            })
            .collect(),
    }
}

pub fn compose_map(
    config: &AppConfig,
    earthquakes: MarkerLayer,
    boundaries: BoundaryLayer,
) -> MapView {
    MapView {
        container_id: config.map.container_id.clone(),
        center: config.map.center,
        zoom: config.map.zoom,
        min_zoom: config.map.min_zoom,
        base_layers: build_base_layers(&config.tiles),
        overlays: vec![
            Overlay {
                name: EARTHQUAKE_OVERLAY.to_string(),
                visible: true,
                layer: OverlayLayer::Markers(earthquakes),
            },
            Overlay {
                name: BOUNDARY_OVERLAY.to_string(),
                visible: true,
                layer: OverlayLayer::Boundaries(boundaries),
            },
        ],
        layer_control: LayerControl { collapsed: false },
        legend: build_legend(),
    }
}
