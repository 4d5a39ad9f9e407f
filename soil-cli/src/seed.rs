//! Synthetic field readings for demos and manual testing

use crate::{CliError, Service};
use rand::Rng;
use soil_health_core::{LngLat, Municipality, SampleDraft, SampleId};
use tracing::info;

/// Spread of generated positions around a municipality centre, in degrees
const JITTER_DEGREES: f64 = 0.03;

/// Create `count` samples through the normal form workflow.
///
/// Temperatures are drawn between 18 and 38 °C with one decimal, so every
/// point-scale band (and the gaps between them) shows up in larger batches.
pub(crate) fn seed(service: &Service, count: usize) -> Result<Vec<SampleId>, CliError> {
    let mut rng = rand::rng();
    let mut ids = Vec::with_capacity(count);

    for i in 0..count {
        let municipality = Municipality::ALL[rng.random_range(0..Municipality::ALL.len())];
        let center = municipality.center();
        let position = LngLat::try_new(
            center.lng + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
            center.lat + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
        )?;
        let temperature: f64 = rng.random_range(18.0..38.0);

        let mut draft = SampleDraft::new();
        draft
            .set_municipality(municipality)
            .set_location(
                format!("{} Plot {}", municipality.display_name(), i + 1),
                position,
            )
            .set_nitrogen(format!("{:.2}", rng.random_range(0.10..0.35)))
            .set_phosphorus(format!("{:.2}", rng.random_range(0.08..0.25)))
            .set_potassium(format!("{:.2}", rng.random_range(0.10..0.30)));
        draft.set_temperature(format!("{temperature:.1}"));

        ids.push(service.submit(&draft)?);
    }

    info!("Seeded {} synthetic samples", ids.len());
    Ok(ids)
}
