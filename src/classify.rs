//! Magnitude -> color classification.
//!
//! One ascending table of half-open `[lower, upper)` bands covers the whole
//! real line. Markers and the legend both read from it.

use serde::Serialize;

/// Fill used when a feature has no usable magnitude.
pub const UNKNOWN_COLOR: &str = "#FFEDA0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeBand {
    BelowOne,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    FourToFive,
    FiveToSix,
    SixPlus,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorBand {
    pub lower: f64,
    pub upper: f64,
    pub band: MagnitudeBand,
    pub color: &'static str,
}

impl ColorBand {
    const fn new(lower: f64, upper: f64, band: MagnitudeBand, color: &'static str) -> Self {
        Self { lower, upper, band, color }
    }

    /// Lower bound inclusive, upper exclusive. The last band also takes +inf.
    fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.lower && (magnitude < self.upper || self.upper == f64::INFINITY)
    }
}

pub const COLOR_BANDS: [ColorBand; 7] = [
    ColorBand::new(f64::NEG_INFINITY, 1.0, MagnitudeBand::BelowOne, "#4FFF2F"),
    ColorBand::new(1.0, 2.0, MagnitudeBand::OneToTwo, "#BAFF2F"),
    ColorBand::new(2.0, 3.0, MagnitudeBand::TwoToThree, "#FFC300"),
    ColorBand::new(3.0, 4.0, MagnitudeBand::ThreeToFour, "#FF5733"),
    ColorBand::new(4.0, 5.0, MagnitudeBand::FourToFive, "#C70039"),
    ColorBand::new(5.0, 6.0, MagnitudeBand::FiveToSix, "#900C3F"),
    ColorBand::new(6.0, f64::INFINITY, MagnitudeBand::SixPlus, "#581845"),
];

/// Legend rows: label plus the representative magnitude its swatch is
/// classified from.
pub const LEGEND_GRADES: [(&str, f64); 6] = [
    ("0-1", 0.5),
    ("1-2", 1.5),
    ("2-3", 2.5),
    ("3-4", 3.5),
    ("4-5", 4.5),
    ("5+", 5.5),
];

fn find_band(magnitude: f64) -> Option<&'static ColorBand> {
    COLOR_BANDS.iter().find(|b| b.contains(magnitude))
}

/// Color for a magnitude. NaN falls through every band and gets the
/// unknown color.
pub fn classify(magnitude: f64) -> &'static str {
    find_band(magnitude).map_or(UNKNOWN_COLOR, |b| b.color)
}

pub fn band_of(magnitude: Option<f64>) -> MagnitudeBand {
    magnitude
        .and_then(find_band)
        .map_or(MagnitudeBand::Unknown, |b| b.band)
}

pub fn color_of(band: MagnitudeBand) -> &'static str {
    COLOR_BANDS
        .iter()
        .find(|b| b.band == band)
        .map_or(UNKNOWN_COLOR, |b| b.color)
}
