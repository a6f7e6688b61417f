//! Error types for feed retrieval and the render pipeline.
//!
//! [`FeedError`] covers everything that can go wrong getting one GeoJSON
//! document into typed records. [`PipelineError`] tags a feed error with the
//! stage it stopped.

use crate::pipeline::Stage;

/// Failure fetching or validating one feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to {location} failed: {source}")]
    Network {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{location} returned HTTP {status}")]
    Status { location: String, status: u16 },

    /// A local feed file could not be read.
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The body was not valid GeoJSON.
    #[error("{location} is not valid GeoJSON: {source}")]
    Parse {
        location: String,
        #[source]
        source: geojson::Error,
    },

    /// Valid GeoJSON, wrong structure.
    #[error("{location} has unexpected shape: {reason}")]
    Shape { location: String, reason: String },
}

/// A feed failure together with the stage that was waiting on it.
#[derive(Debug, thiserror::Error)]
#[error("map not rendered ({stage}): {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: FeedError,
}
