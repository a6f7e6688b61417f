use crate::error::FeedError;
use crate::types::{EarthquakeFeature, PlateBoundary};
use chrono::DateTime;
use geo::MultiLineString;
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Something that can turn a feed location into a parsed GeoJSON document.
pub trait FeedFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<GeoJson, FeedError>> + Send;
}

/// Fetches `http(s)://` locations with GET and reads anything else from disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let network = |source| FeedError::Network {
            location: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(network)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(network)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<GeoJson, FeedError> {
        debug!(location, "fetching feed");
        let body = if is_remote(location) {
            self.get_text(location).await?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|source| FeedError::Io {
                    location: location.to_string(),
                    source,
                })?
        };

        body.parse::<GeoJson>().map_err(|source| FeedError::Parse {
            location: location.to_string(),
            source,
        })
    }
}

fn into_collection(location: &str, geojson: GeoJson) -> Result<FeatureCollection, FeedError> {
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) => Err(shape(location, "expected a FeatureCollection, got Feature")),
        GeoJson::Geometry(_) => Err(shape(location, "expected a FeatureCollection, got Geometry")),
    }
}

fn shape(location: &str, reason: &str) -> FeedError {
    FeedError::Shape {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// Validates the earthquake feed. Features without a usable point are
/// dropped; a missing magnitude is kept as `None`.
pub fn parse_earthquakes(
    location: &str,
    geojson: GeoJson,
) -> Result<Vec<EarthquakeFeature>, FeedError> {
    let collection = into_collection(location, geojson)?;
    let total = collection.features.len();

    let quakes: Vec<EarthquakeFeature> = collection
        .features
        .iter()
        .filter_map(earthquake_from_feature)
        .collect();

    if quakes.len() < total {
        warn!(
            location,
            skipped = total - quakes.len(),
            "dropped earthquake features without point geometry"
        );
    }
    Ok(quakes)
}

fn earthquake_from_feature(feature: &Feature) -> Option<EarthquakeFeature> {
    let position = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(position)) => position,
        _ => return None,
    };
    let (lon, lat) = match position.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return None,
    };

    let magnitude = feature.property("mag").and_then(|v| v.as_f64());
    let place = feature
        .property("place")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let time = feature
        .property("time")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|ms| ms as i64)))
        .and_then(DateTime::from_timestamp_millis);

    Some(EarthquakeFeature {
        magnitude,
        place,
        time,
        location: geo::Point::new(lon, lat),
        depth: position.get(2).copied(),
    })
}

/// Validates the plate boundary feed. Only line geometries are kept.
pub fn parse_boundaries(
    location: &str,
    geojson: GeoJson,
) -> Result<Vec<PlateBoundary>, FeedError> {
    let collection = into_collection(location, geojson)?;
    let total = collection.features.len();

    let boundaries: Vec<PlateBoundary> = collection
        .features
        .into_iter()
        .filter_map(boundary_from_feature)
        .collect();

    if boundaries.len() < total {
        warn!(
            location,
            skipped = total - boundaries.len(),
            "dropped non-line boundary features"
        );
    }
    Ok(boundaries)
}

fn boundary_from_feature(feature: Feature) -> Option<PlateBoundary> {
    let name = feature
        .property("Name")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let geometry: geo::Geometry<f64> = feature.geometry?.value.try_into().ok()?;
    let lines = match geometry {
        geo::Geometry::LineString(ls) => MultiLineString::new(vec![ls]),
        geo::Geometry::MultiLineString(mls) => mls,
        _ => return None, // Skip points/polygons
    };

    Some(PlateBoundary { name, lines })
}
