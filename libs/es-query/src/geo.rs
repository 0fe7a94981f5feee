//! Geographic primitives used by the query compiler and its callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("invalid point '{0}': expected 'lat,lon'")]
    InvalidPoint(String),

    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

impl Point {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Parse a `"lat,lon"` pair as it appears in query strings.
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        let mut parts = text.splitn(2, ',');
        let (Some(lat), Some(lon)) = (parts.next(), parts.next()) else {
            return Err(GeoError::InvalidPoint(text.to_string()));
        };

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidPoint(text.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidPoint(text.to_string()))?;

        Self::new(lat, lon)
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    pub fn haversine_km(&self, other: &Point) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// An axis-aligned bounding box normalized from two arbitrary corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// The corners may be given in any order; the box always comes out with
    /// south <= north and west <= east.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lon.min(b.lon),
            north: a.lat.max(b.lat),
            east: a.lon.max(b.lon),
        }
    }
}
