//! Sample markers and their reconciliation against the canonical list

use crate::agronomy::{FertilityLevel, PhClass, TemperatureRange};
use crate::core_types::{LngLat, NutrientFraction, SampleId, UserId};
use crate::sample::SoilSample;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text shown in a marker's popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupContent {
    /// Location name
    pub title: String,
    /// Municipality display name
    pub municipality: String,
    /// pH as stored
    pub ph: String,
    /// pH legend class, e.g. "Slightly Acidic"
    pub ph_class: String,
    /// Temperature with unit, e.g. "28°C"
    pub temperature: String,
    /// Temperature legend class
    pub temperature_range: String,
    /// Fertility with unit, e.g. "72%"
    pub fertility: String,
    /// Fertility legend class
    pub fertility_level: String,
    /// Nitrogen as a whole percentage
    pub nitrogen: String,
    /// Phosphorus as a whole percentage
    pub phosphorus: String,
    /// Potassium as a whole percentage
    pub potassium: String,
}

fn nutrient_text(value: Option<NutrientFraction>) -> String {
    value.map_or_else(
        || "n/a".to_string(),
        |v| format!("{:.0}%", v.as_display_percent()),
    )
}

impl PopupContent {
    /// Popup text for a sample
    pub fn for_sample(sample: &SoilSample) -> Self {
        Self {
            title: sample.location.clone(),
            municipality: sample.municipality.display_name().to_string(),
            ph: sample.ph.to_string(),
            ph_class: PhClass::classify(sample.ph).label().to_string(),
            temperature: sample.temperature.to_string(),
            temperature_range: TemperatureRange::classify(sample.temperature)
                .label()
                .to_string(),
            fertility: sample.fertility.to_string(),
            fertility_level: FertilityLevel::classify(sample.fertility)
                .label()
                .to_string(),
            nitrogen: nutrient_text(sample.nitrogen),
            phosphorus: nutrient_text(sample.phosphorus),
            potassium: nutrient_text(sample.potassium),
        }
    }
}

/// One rendered sample on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Sample the marker stands for
    pub id: SampleId,
    /// Map position
    pub position: LngLat,
    /// Fill colour from the pH legend
    pub color: String,
    /// Popup text
    pub popup: PopupContent,
    /// Whether the viewer may edit or delete the sample
    pub editable: bool,
}

impl Marker {
    /// Marker for `sample` as seen by `viewer`
    pub fn for_sample(sample: &SoilSample, viewer: Option<&UserId>) -> Self {
        Self {
            id: sample.id,
            position: sample.coordinates,
            color: PhClass::classify(sample.ph).marker_color().to_string(),
            popup: PopupContent::for_sample(sample),
            editable: viewer.is_some_and(|v| sample.is_owned_by(v)),
        }
    }
}

/// Change to apply to the rendered map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerPatch {
    /// New sample
    Added(Marker),
    /// Sample whose rendering changed
    Updated(Marker),
    /// Sample no longer in the list
    Removed(SampleId),
}

/// Markers currently on the map, keyed by sample id
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: FxHashMap<SampleId, Marker>,
}

impl MarkerLayer {
    /// Empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markers
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are shown
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker for a sample id
    pub fn get(&self, id: SampleId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Markers ordered by sample id
    pub fn markers(&self) -> Vec<&Marker> {
        let mut out: Vec<&Marker> = self.markers.values().collect();
        out.sort_unstable_by_key(|m| m.id);
        out
    }

    /// Bring the layer in line with `samples` and return what changed.
    ///
    /// Added and updated patches follow the order of `samples`; removals
    /// come last, ordered by id. A sample whose marker would render the same
    /// produces no patch. The patches are already applied on return.
    pub fn reconcile(&mut self, samples: &[SoilSample], viewer: Option<&UserId>) -> Vec<MarkerPatch> {
        let mut patches = Vec::new();
        let mut seen = FxHashSet::default();
        let (mut added, mut updated) = (0usize, 0usize);

        for sample in samples {
            seen.insert(sample.id);
            let marker = Marker::for_sample(sample, viewer);
            match self.markers.get(&sample.id) {
                Some(existing) if *existing == marker => continue,
                Some(_) => {
                    updated += 1;
                    patches.push(MarkerPatch::Updated(marker.clone()));
                }
                None => {
                    added += 1;
                    patches.push(MarkerPatch::Added(marker.clone()));
                }
            }
            self.markers.insert(sample.id, marker);
        }

        let mut removed: Vec<SampleId> = self
            .markers
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        removed.sort_unstable();
        for id in &removed {
            self.markers.remove(id);
        }
        let removed_count = removed.len();
        patches.extend(removed.into_iter().map(MarkerPatch::Removed));

        debug!(
            "Reconciled {} markers: {} added, {} updated, {} removed",
            self.markers.len(),
            added,
            updated,
            removed_count
        );
        patches
    }
}
