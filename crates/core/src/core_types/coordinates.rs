//! Geographic positions for sample placement on the map

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid longitude/latitude pair
#[derive(Debug, Clone, PartialEq, Error)]
#[error("coordinates ({lng}, {lat}) are outside longitude [-180, 180] / latitude [-90, 90]")]
pub struct CoordinateError {
    /// Rejected longitude
    pub lng: f64,
    /// Rejected latitude
    pub lat: f64,
}

/// Longitude/latitude pair in decimal degrees (WGS84, map-library order)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees east
    pub lng: f64,
    /// Latitude in degrees north
    pub lat: f64,
}

impl LngLat {
    /// Create a validated coordinate pair.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when either component is non-finite or out of range.
    pub fn try_new(lng: f64, lat: f64) -> Result<Self, CoordinateError> {
        let valid = lng.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lng)
            && (-90.0..=90.0).contains(&lat);
        if valid {
            Ok(Self { lng, lat })
        } else {
            Err(CoordinateError { lng, lat })
        }
    }

    /// Construct from compile-time constants known to be valid
    pub(crate) const fn new_const(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Position as a vector (x = longitude, y = latitude)
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.lng, self.lat)
    }

    /// Mean position of a set of points, `None` when empty.
    ///
    /// Plain arithmetic mean; adequate for the few-kilometre spread of a
    /// single province.
    pub fn centroid(points: &[LngLat]) -> Option<LngLat> {
        if points.is_empty() {
            return None;
        }
        let sum = points
            .iter()
            .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.to_vector());
        let mean = sum / points.len() as f64;
        Some(LngLat::from(mean))
    }

    /// "lat, lng" with six decimals, as shown under the location field
    pub fn display_lat_lng(self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl From<Vector2<f64>> for LngLat {
    fn from(v: Vector2<f64>) -> Self {
        Self { lng: v.x, lat: v.y }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> [f64; 2] {
        [p.lng, p.lat]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(LngLat::try_new(120.8, 17.55).is_ok());
        assert!(LngLat::try_new(181.0, 0.0).is_err());
        assert!(LngLat::try_new(0.0, -90.5).is_err());
        assert!(LngLat::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_centroid() {
        let pts = [
            LngLat::new_const(120.0, 17.0),
            LngLat::new_const(121.0, 18.0),
        ];
        let c = LngLat::centroid(&pts).unwrap();
        assert_relative_eq!(c.lng, 120.5);
        assert_relative_eq!(c.lat, 17.5);
        assert!(LngLat::centroid(&[]).is_none());
    }

    #[test]
    fn test_display_is_lat_first() {
        let p = LngLat::new_const(120.95, 17.45);
        assert_eq!(p.display_lat_lng(), "17.450000, 120.950000");
    }
}
