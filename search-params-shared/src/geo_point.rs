//! Geographic coordinate pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValueParseError;

/// A latitude/longitude pair, written as `"lat,lon"` in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geo point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for GeoPoint {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| ValueParseError::geo_point(format!("'{}' is not a lat,lon pair", s)))?;

        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| ValueParseError::geo_point(format!("latitude '{}': {}", lat.trim(), e)))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| ValueParseError::geo_point(format!("longitude '{}': {}", lon.trim(), e)))?;

        Ok(Self { lat, lon })
    }
}
