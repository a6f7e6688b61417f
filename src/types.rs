use chrono::{DateTime, Utc};
use geo::{MultiLineString, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeature {
    pub magnitude: Option<f64>, // None when the feed has null or no `mag`
    pub place: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub location: Point<f64>, // x = lon, y = lat
    pub depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundary {
    pub name: Option<String>,
    pub lines: MultiLineString<f64>,
}
