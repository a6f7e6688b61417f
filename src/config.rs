use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use anyhow::{Context, Result};

pub const DEFAULT_EARTHQUAKE_FEED: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_BOUNDARY_FEED: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";
pub const DEFAULT_TILE_URL: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
pub const DEFAULT_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feeds: FeedConfig,
    pub tiles: TileConfig,
    pub map: MapConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

/// Where the two GeoJSON documents come from. Either an http(s) URL or a
/// local file path.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub earthquakes: String,
    pub boundaries: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            earthquakes: DEFAULT_EARTHQUAKE_FEED.to_string(),
            boundaries: DEFAULT_BOUNDARY_FEED.to_string(),
            timeout_secs: 30,
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TileConfig {
    /// `{id}` and `{accessToken}` are filled in; `{z}/{x}/{y}` are left for Leaflet.
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub street_style: String,
    pub dark_style: String,
    pub access_token: Option<String>,
    pub access_token_env: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            max_zoom: 18,
            street_style: "mapbox.streets".to_string(),
            dark_style: "mapbox.dark".to_string(),
            access_token: None,
            access_token_env: "MAPBOX_ACCESS_TOKEN".to_string(),
        }
    }
}

impl TileConfig {
    /// The explicit token wins, then the environment variable, then empty.
    pub fn resolve_access_token(&self) -> String {
        if let Some(token) = &self.access_token {
            return token.clone();
        }
        env::var(&self.access_token_env).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub container_id: String,
    pub center: [f64; 2], // [lat, lon]
    pub zoom: f64,
    pub min_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map".to_string(),
            center: [30.0, 0.0],
            zoom: 2.6,
            min_zoom: 2.6,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub html: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: PathBuf::from("output/index.html"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.feeds.earthquakes, DEFAULT_EARTHQUAKE_FEED);
        assert_eq!(config.feeds.boundaries, DEFAULT_BOUNDARY_FEED);
        assert_eq!(config.map.container_id, "map");
        assert_eq!(config.map.center, [30.0, 0.0]);
        assert_eq!(config.tiles.max_zoom, 18);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [feeds]
            earthquakes = "fixtures/quakes.geojson"

            [tiles]
            access_token = "pk.test"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.feeds.earthquakes, "fixtures/quakes.geojson");
        assert_eq!(config.feeds.boundaries, DEFAULT_BOUNDARY_FEED);
        assert_eq!(config.feeds.timeout(), Duration::from_secs(30));
        assert_eq!(config.tiles.resolve_access_token(), "pk.test");
        assert_eq!(config.tiles.dark_style, "mapbox.dark");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn token_falls_back_to_environment() {
        env::set_var("QUAKEMAP_TEST_TOKEN_FROM_ENV", "pk.env");
        let tiles = TileConfig {
            access_token_env: "QUAKEMAP_TEST_TOKEN_FROM_ENV".to_string(),
            ..TileConfig::default()
        };
        assert_eq!(tiles.resolve_access_token(), "pk.env");
    }

    #[test]
    fn explicit_token_beats_environment() {
        env::set_var("QUAKEMAP_TEST_TOKEN_SHADOWED", "pk.env");
        let tiles = TileConfig {
            access_token: Some("pk.config".to_string()),
            access_token_env: "QUAKEMAP_TEST_TOKEN_SHADOWED".to_string(),
            ..TileConfig::default()
        };
        assert_eq!(tiles.resolve_access_token(), "pk.config");
    }

    #[test]
    fn token_is_empty_when_unset() {
        let tiles = TileConfig {
            access_token_env: "QUAKEMAP_TEST_TOKEN_NEVER_SET".to_string(),
            ..TileConfig::default()
        };
        assert_eq!(tiles.resolve_access_token(), "");
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(AppConfig::from_toml("[server]\nport = \"nope\"").is_err());
    }

    #[test]
    fn sample_config_parses() {
        let config = AppConfig::from_toml(include_str!("../config.toml")).unwrap();
        assert_eq!(config.map.zoom, 2.6);
        assert_eq!(config.output.html, PathBuf::from("output/index.html"));
    }
}
