//! Fetch -> build -> compose, strictly in order.
//!
//! Earthquakes are fetched and turned into markers before the boundary feed
//! is requested. A failure at either fetch ends the run with no view.

use crate::compose::{compose_map, MapView};
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::feed::{parse_boundaries, parse_earthquakes, FeedFetcher};
use crate::layers::{build_boundary_layer, build_marker_layer};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingEarthquakeData,
    AwaitingBoundaryData,
    Rendered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitingEarthquakeData => "awaiting earthquake data",
            Stage::AwaitingBoundaryData => "awaiting boundary data",
            Stage::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

pub async fn render_map<F: FeedFetcher>(
    config: &AppConfig,
    fetcher: &F,
) -> Result<MapView, PipelineError> {
    let result = run(config, fetcher).await;
    if let Err(e) = &result {
        warn!(stage = %e.stage, error = %e.source, "map render failed");
    }
    result
}

async fn run<F: FeedFetcher>(
    config: &AppConfig,
    fetcher: &F,
) -> Result<MapView, PipelineError> {
    let mut stage = Stage::AwaitingEarthquakeData;
    let fail = |stage| move |source| PipelineError { stage, source };

    let location = config.feeds.earthquakes.as_str();
    info!(%stage, location, "fetching earthquakes");
    let doc = fetcher.fetch(location).await.map_err(fail(stage))?;
    let quakes = parse_earthquakes(location, doc).map_err(fail(stage))?;
    let markers = build_marker_layer(&quakes);
    info!(markers = markers.len(), "built earthquake layer");

    stage = Stage::AwaitingBoundaryData;
    let location = config.feeds.boundaries.as_str();
    info!(%stage, location, "fetching plate boundaries");
    let doc = fetcher.fetch(location).await.map_err(fail(stage))?;
    let boundaries = parse_boundaries(location, doc).map_err(fail(stage))?;
    let boundary_layer = build_boundary_layer(&boundaries);
    info!(boundaries = boundary_layer.lines.len(), "built boundary layer");

    let view = compose_map(config, markers, boundary_layer);
    info!(stage = %Stage::Rendered, "map composed");
    Ok(view)
}
