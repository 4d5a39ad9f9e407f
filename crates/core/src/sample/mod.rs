//! Soil sample records
//!
//! A [`SoilSample`] is the persisted form of one field measurement. Samples
//! are assembled from a [`SampleDraft`] (the entry form), created through a
//! repository and afterwards changed only through [`SampleUpdate`].
//!
//! `point_scale` always follows `temperature`: it is recomputed whenever the
//! temperature is set, while `ph`/`fertility` are only initialized from it.

pub mod draft;

pub use draft::{SampleDraft, ValidationError};

use crate::agronomy::soil_derivation::PointScale;
use crate::core_types::{
    Celsius, LngLat, Municipality, NutrientFraction, Percent, Ph, SampleId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sample ready to be created (no id or timestamp yet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSample {
    /// Submitting user; governs edit/delete rights
    pub owner_id: UserId,
    /// Municipality the sample was taken in
    pub municipality: Municipality,
    /// Free-text or map-picked place name
    pub location: String,
    /// Map position
    pub coordinates: LngLat,
    /// Measured soil temperature
    pub temperature: Celsius,
    /// pH (derived by default, user-overridable)
    pub ph: Ph,
    /// Overall fertility (derived by default, user-overridable)
    pub fertility: Percent,
    /// Classification computed from `temperature`
    pub point_scale: PointScale,
    /// Nitrogen content
    pub nitrogen: Option<NutrientFraction>,
    /// Phosphorus content
    pub phosphorus: Option<NutrientFraction>,
    /// Potassium content
    pub potassium: Option<NutrientFraction>,
}

impl NewSample {
    /// Attach repository-assigned identity
    pub fn into_sample(self, id: SampleId, created_at: DateTime<Utc>) -> SoilSample {
        SoilSample {
            id,
            owner_id: self.owner_id,
            municipality: self.municipality,
            location: self.location,
            coordinates: self.coordinates,
            temperature: self.temperature,
            ph: self.ph,
            fertility: self.fertility,
            point_scale: self.point_scale,
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            created_at,
        }
    }
}

/// A persisted soil sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    /// Repository id
    pub id: SampleId,
    /// Submitting user
    pub owner_id: UserId,
    /// Municipality the sample was taken in
    pub municipality: Municipality,
    /// Place name
    pub location: String,
    /// Map position
    pub coordinates: LngLat,
    /// Measured soil temperature
    pub temperature: Celsius,
    /// pH
    pub ph: Ph,
    /// Overall fertility
    pub fertility: Percent,
    /// Classification computed from `temperature`
    pub point_scale: PointScale,
    /// Nitrogen content
    #[serde(default)]
    pub nitrogen: Option<NutrientFraction>,
    /// Phosphorus content
    #[serde(default)]
    pub phosphorus: Option<NutrientFraction>,
    /// Potassium content
    #[serde(default)]
    pub potassium: Option<NutrientFraction>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl SoilSample {
    /// Whether `user` may edit or delete this sample
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Apply a partial edit.
    ///
    /// Changing the temperature recomputes `point_scale`. pH and fertility
    /// keep whatever values they hold unless the update sets them.
    pub fn apply(&mut self, update: &SampleUpdate) {
        if let Some(location) = &update.location {
            self.location.clone_from(location);
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
            self.point_scale = PointScale::for_temperature(temperature);
        }
        if let Some(ph) = update.ph {
            self.ph = ph;
        }
        if let Some(fertility) = update.fertility {
            self.fertility = fertility;
        }
        if let Some(n) = update.nitrogen {
            self.nitrogen = Some(n);
        }
        if let Some(p) = update.phosphorus {
            self.phosphorus = Some(p);
        }
        if let Some(k) = update.potassium {
            self.potassium = Some(k);
        }
    }
}

/// Partial edit of a sample; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleUpdate {
    /// New place name
    pub location: Option<String>,
    /// New temperature (recomputes the point scale)
    pub temperature: Option<Celsius>,
    /// New pH
    pub ph: Option<Ph>,
    /// New fertility
    pub fertility: Option<Percent>,
    /// New nitrogen content
    pub nitrogen: Option<NutrientFraction>,
    /// New phosphorus content
    pub phosphorus: Option<NutrientFraction>,
    /// New potassium content
    pub potassium: Option<NutrientFraction>,
}

impl SampleUpdate {
    /// True when the update changes nothing
    pub fn is_empty(&self) -> bool {
        self == &SampleUpdate::default()
    }
}
