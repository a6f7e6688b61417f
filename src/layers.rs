use crate::classify::{band_of, color_of, MagnitudeBand};
use crate::types::{EarthquakeFeature, PlateBoundary};
use chrono::{DateTime, Utc};
use serde::Serialize;

const MARKER_STROKE: &str = "#000";
const BOUNDARY_COLOR: &str = "orange";

/// Options handed straight to `L.circleMarker`, hence camelCase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub lat_lng: [f64; 2],
    pub band: MagnitudeBand,
    pub style: MarkerStyle,
    pub popup: Popup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub markers: Vec<CircleMarker>,
}

impl MarkerLayer {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Options for `L.polyline`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f64,
    pub smooth_factor: f64,
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: BOUNDARY_COLOR,
            weight: 2.0,
            smooth_factor: 1.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryLine {
    pub name: Option<String>,
    pub lat_lngs: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundaryLayer {
    pub lines: Vec<BoundaryLine>,
    pub style: LineStyle,
}

/// No recorded event comes near this; past it `2^m` overflows to inf.
pub const MAX_RADIUS_EXPONENT: f64 = 10.0;

/// Exponential so larger events dominate visually. Unknown magnitude
/// draws as if it were 0, and the exponent is capped at
/// [`MAX_RADIUS_EXPONENT`].
pub fn marker_radius(magnitude: Option<f64>) -> f64 {
    match magnitude {
        Some(m) if !m.is_nan() => 2f64.powf(m.min(MAX_RADIUS_EXPONENT)),
        _ => 1.0,
    }
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%a %b %d %Y %H:%M:%S UTC").to_string()
}

fn popup_for(quake: &EarthquakeFeature) -> Popup {
    let title = quake
        .place
        .clone()
        .unwrap_or_else(|| "Unknown location".to_string());

    let mut lines = Vec::with_capacity(2);
    if let Some(m) = quake.magnitude {
        lines.push(format!("M {m:.1}"));
    }
    lines.push(quake.time.as_ref().map_or_else(|| "Unknown time".to_string(), format_time));

    Popup { title, lines }
}

pub fn build_marker(quake: &EarthquakeFeature) -> CircleMarker {
    let band = band_of(quake.magnitude);
    CircleMarker {
        lat_lng: [quake.location.y(), quake.location.x()],
        band,
        style: MarkerStyle {
            radius: marker_radius(quake.magnitude),
            fill_color: color_of(band),
            color: MARKER_STROKE,
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        },
        popup: popup_for(quake),
    }
}

pub fn build_marker_layer(quakes: &[EarthquakeFeature]) -> MarkerLayer {
    MarkerLayer {
        markers: quakes.iter().map(build_marker).collect(),
    }
}

pub fn build_boundary_layer(boundaries: &[PlateBoundary]) -> BoundaryLayer {
    let lines = boundaries
        .iter()
        .map(|boundary| BoundaryLine {
            name: boundary.name.clone(),
            // Leaflet wants [lat, lon]
            lat_lngs: boundary
                .lines
                .0
                .iter()
                .map(|ls| ls.coords().map(|c| [c.y, c.x]).collect())
                .collect(),
        })
        .collect();

    BoundaryLayer {
        lines,
        style: LineStyle::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use geo::{line_string, MultiLineString, Point};

    fn quake(magnitude: Option<f64>) -> EarthquakeFeature {
        EarthquakeFeature {
            magnitude,
            place: Some("10km N of Testville".to_string()),
            time: DateTime::from_timestamp_millis(1_700_000_000_000),
            location: Point::new(-117.5, 35.25),
            depth: None,
        }
    }

    #[test]
    fn radius_grows_with_magnitude() {
        let mags = [-1.0, 0.0, 0.5, 1.0, 2.4, 3.0, 5.99, 6.0, 8.8];
        for pair in mags.windows(2) {
            assert!(marker_radius(Some(pair[1])) > marker_radius(Some(pair[0])));
        }
    }

    #[test]
    fn radius_is_capped_and_finite() {
        let cap = 2f64.powf(MAX_RADIUS_EXPONENT);
        assert!(marker_radius(Some(9.9)) < cap);
        assert_eq!(marker_radius(Some(1100.0)), cap);
        assert_eq!(marker_radius(Some(f64::INFINITY)), cap);

        let json = serde_json::to_value(build_marker(&quake(Some(1200.0)))).unwrap();
        assert_eq!(json["style"]["radius"], cap);
        assert_eq!(build_marker(&quake(Some(f64::INFINITY))).band, MagnitudeBand::SixPlus);
    }

    #[test]
    fn unknown_magnitude_gets_unit_radius() {
        assert_eq!(marker_radius(None), 1.0);
        assert_eq!(marker_radius(Some(f64::NAN)), 1.0);
        let marker = build_marker(&quake(None));
        assert_eq!(marker.band, MagnitudeBand::Unknown);
        assert_eq!(marker.style.fill_color, crate::classify::UNKNOWN_COLOR);
        assert_eq!(marker.popup.lines, vec!["Tue Nov 14 2023 22:13:20 UTC"]);
    }

    #[test]
    fn single_feature_marker() {
        let marker = build_marker(&quake(Some(2.4)));
        assert_eq!(marker.style.fill_color, classify(2.4));
        assert_eq!(marker.style.fill_color, "#FFC300");
        assert!((marker.style.radius - 5.278).abs() < 1e-3);
        assert_eq!(marker.lat_lng, [35.25, -117.5]);
        assert_eq!(marker.style.color, "#000");
        assert_eq!(marker.style.weight, 1.0);
        assert_eq!(marker.style.opacity, 1.0);
        assert_eq!(marker.style.fill_opacity, 0.8);
    }

    #[test]
    fn popup_has_place_and_time() {
        let marker = build_marker(&quake(Some(2.4)));
        assert_eq!(marker.popup.title, "10km N of Testville");
        assert_eq!(marker.popup.lines, vec!["M 2.4", "Tue Nov 14 2023 22:13:20 UTC"]);
    }

    #[test]
    fn popup_falls_back_when_fields_missing() {
        let mut q = quake(Some(1.0));
        q.place = None;
        q.time = None;
        let popup = build_marker(&q).popup;
        assert_eq!(popup.title, "Unknown location");
        assert_eq!(popup.lines, vec!["M 1.0", "Unknown time"]);
    }

    #[test]
    fn empty_input_gives_empty_layer() {
        let layer = build_marker_layer(&[]);
        assert!(layer.is_empty());
        assert_eq!(layer.len(), 0);
    }

    #[test]
    fn boundary_layer_flips_to_lat_lon() {
        let boundary = PlateBoundary {
            name: Some("AF-AN".to_string()),
            lines: MultiLineString::new(vec![line_string![
                (x: -0.4, y: -54.8),
                (x: 0.3, y: -54.6),
            ]]),
        };
        let layer = build_boundary_layer(&[boundary]);
        assert_eq!(layer.lines.len(), 1);
        assert_eq!(layer.lines[0].lat_lngs, vec![vec![[-54.8, -0.4], [-54.6, 0.3]]]);
        assert_eq!(layer.style.color, "orange");
        assert_eq!(layer.style.weight, 2.0);
    }

    #[test]
    fn marker_style_serializes_for_leaflet() {
        let json = serde_json::to_value(build_marker(&quake(Some(2.4)))).unwrap();
        assert_eq!(json["style"]["fillColor"], "#FFC300");
        assert_eq!(json["style"]["fillOpacity"], 0.8);
        assert_eq!(json["latLng"][0], 35.25);
        assert_eq!(json["band"], "two_to_three");
    }
}
