//! Canned feed documents and an in-memory fetcher for tests.

use crate::error::FeedError;
use crate::feed::FeedFetcher;
use geojson::GeoJson;
use std::collections::HashMap;
use std::sync::Mutex;

pub const EARTHQUAKE_URL: &str = "https://feeds.test/quakes.geojson";
pub const BOUNDARY_URL: &str = "https://feeds.test/boundaries.json";

pub const EARTHQUAKES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "mag": 2.4, "place": "10km N of Testville", "time": 1700000000000 },
      "geometry": { "type": "Point", "coordinates": [-117.5, 35.25, 8.1] }
    },
    {
      "type": "Feature",
      "properties": { "mag": 6.3, "place": "Offshore <b>Bold</b> Region", "time": 1700000360000 },
      "geometry": { "type": "Point", "coordinates": [142.1, 38.3, 24.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": null, "place": "Nowhere" },
      "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
    }
  ]
}"#;

pub const SINGLE_EARTHQUAKE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "mag": 2.4, "place": "10km N of Testville", "time": 1700000000000 },
      "geometry": { "type": "Point", "coordinates": [-117.5, 35.25] }
    }
  ]
}"#;

pub const EMPTY: &str = r#"{ "type": "FeatureCollection", "features": [] }"#;

pub const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "Name": "AF-AN" },
      "geometry": { "type": "LineString", "coordinates": [[-0.4, -54.8], [-0.04, -54.7], [0.3, -54.6]] }
    },
    {
      "type": "Feature",
      "properties": { "Name": "PA-NA" },
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[-125.0, 40.0], [-124.0, 41.0]],
          [[-123.0, 42.0], [-122.0, 43.0]]
        ]
      }
    }
  ]
}"#;

/// Serves canned documents by location and records every request in order.
/// Unknown locations fail with a 503.
pub struct MockFetcher {
    documents: HashMap<String, String>,
    pub requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new(documents: &[(&str, &str)]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|(location, body)| (location.to_string(), body.to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_both_feeds(earthquakes: &str) -> Self {
        Self::new(&[(EARTHQUAKE_URL, earthquakes), (BOUNDARY_URL, BOUNDARIES)])
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl FeedFetcher for MockFetcher {
    async fn fetch(&self, location: &str) -> Result<GeoJson, FeedError> {
        self.requests.lock().unwrap().push(location.to_string());
        let body = self.documents.get(location).ok_or_else(|| FeedError::Status {
            location: location.to_string(),
            status: 503,
        })?;
        body.parse::<GeoJson>().map_err(|source| FeedError::Parse {
            location: location.to_string(),
            source,
        })
    }
}

pub fn test_config() -> crate::config::AppConfig {
    let mut config = crate::config::AppConfig::default();
    config.feeds.earthquakes = EARTHQUAKE_URL.to_string();
    config.feeds.boundaries = BOUNDARY_URL.to_string();
    config.tiles.access_token = Some("pk.test-token".to_string());
    config
}
