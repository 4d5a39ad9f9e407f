//! Camera positions for the overview map and the location picker

use crate::core_types::{LngLat, Municipality};
use crate::sample::SoilSample;
use serde::{Deserialize, Serialize};

/// Map centre and zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    /// Centre of the view
    pub center: LngLat,
    /// Map-library zoom level
    pub zoom: f64,
}

impl MapViewport {
    /// Centre of the overview map (Abra province)
    pub const DEFAULT_CENTER: LngLat = LngLat::new_const(120.8, 17.55);
    /// Zoom of the overview map
    pub const DEFAULT_ZOOM: f64 = 10.5;
    /// Zoom the location picker opens at
    pub const PICKER_ZOOM: f64 = 12.0;

    /// Viewport with an explicit centre and zoom
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Location picker view for a municipality
    pub fn for_municipality(municipality: Municipality) -> Self {
        Self::new(municipality.center(), Self::PICKER_ZOOM)
    }

    /// Recentre on the mean position of `samples`, keeping the zoom.
    /// An empty list leaves the view unchanged.
    pub fn fit_samples(self, samples: &[SoilSample]) -> Self {
        let points: Vec<LngLat> = samples.iter().map(|s| s.coordinates).collect();
        match LngLat::centroid(&points) {
            Some(center) => Self { center, ..self },
            None => self,
        }
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CENTER, Self::DEFAULT_ZOOM)
    }
}
