//! Sample entry form state
//!
//! Fields are held as text exactly as typed. Setting the temperature
//! pre-populates pH and fertility from the derivation; either can then be
//! overridden before submission. The point scale is never stored in the draft:
//! it is computed from the final temperature inside [`SampleDraft::submit`].

use crate::agronomy::soil_derivation::{derive_from_input, DerivedParameters, PointScale};
use crate::core_types::{
    Celsius, LngLat, Municipality, NutrientFraction, Percent, Ph, UnitError, UserId,
};
use crate::sample::NewSample;
use thiserror::Error;

/// Reasons a draft cannot be submitted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
    /// A field holds an unparseable or out-of-range value
    #[error("field '{field}': {source}")]
    InvalidValue {
        /// Form field name
        field: &'static str,
        /// Underlying unit error
        #[source]
        source: UnitError,
    },
}

/// Editable state of the "New Soil Sample" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleDraft {
    municipality: Option<Municipality>,
    location: String,
    coordinates: Option<LngLat>,
    temperature: String,
    ph: String,
    fertility: String,
    nitrogen: String,
    phosphorus: String,
    potassium: String,
}

impl SampleDraft {
    /// Empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the municipality
    pub fn set_municipality(&mut self, municipality: Municipality) -> &mut Self {
        self.municipality = Some(municipality);
        self
    }

    /// Type a place name without picking on the map
    pub fn set_location_text(&mut self, location: impl Into<String>) -> &mut Self {
        self.location = location.into();
        self
    }

    /// Accept a location chosen in the map picker
    pub fn set_location(&mut self, location: impl Into<String>, coordinates: LngLat) -> &mut Self {
        self.location = location.into();
        self.coordinates = Some(coordinates);
        self
    }

    /// Type into the temperature field.
    ///
    /// When the text parses to a finite temperature, pH and fertility are
    /// replaced with the derived defaults (pH to one decimal, fertility as a
    /// whole percentage) and the derivation is returned. Otherwise the other
    /// fields are left alone.
    pub fn set_temperature(&mut self, input: impl Into<String>) -> Option<DerivedParameters> {
        self.temperature = input.into();
        let derived = derive_from_input(&self.temperature).ok()?;
        self.ph = format!("{:.1}", derived.ph());
        self.fertility = format!("{:.0}", derived.fertility());
        Some(derived)
    }

    /// Override the pH field
    pub fn set_ph(&mut self, input: impl Into<String>) -> &mut Self {
        self.ph = input.into();
        self
    }

    /// Override the fertility field
    pub fn set_fertility(&mut self, input: impl Into<String>) -> &mut Self {
        self.fertility = input.into();
        self
    }

    /// Set the nitrogen field
    pub fn set_nitrogen(&mut self, input: impl Into<String>) -> &mut Self {
        self.nitrogen = input.into();
        self
    }

    /// Set the phosphorus field
    pub fn set_phosphorus(&mut self, input: impl Into<String>) -> &mut Self {
        self.phosphorus = input.into();
        self
    }

    /// Set the potassium field
    pub fn set_potassium(&mut self, input: impl Into<String>) -> &mut Self {
        self.potassium = input.into();
        self
    }

    /// Current pH text
    pub fn ph_text(&self) -> &str {
        &self.ph
    }

    /// Current fertility text
    pub fn fertility_text(&self) -> &str {
        &self.fertility
    }

    /// Selected municipality
    pub fn municipality(&self) -> Option<Municipality> {
        self.municipality
    }

    /// Coordinates picked on the map
    pub fn coordinates(&self) -> Option<LngLat> {
        self.coordinates
    }

    /// Derivation for the temperature as currently typed
    pub fn derived(&self) -> Option<DerivedParameters> {
        derive_from_input(&self.temperature).ok()
    }

    /// Validate the form and assemble a record owned by `owner`.
    ///
    /// Municipality, coordinates, temperature and pH are required. A blank
    /// fertility falls back to the derived value. The point scale is computed
    /// here from the final temperature.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for missing required fields or values that
    /// do not parse or lie outside their range.
    pub fn submit(&self, owner: &UserId) -> Result<NewSample, ValidationError> {
        let municipality = self
            .municipality
            .ok_or(ValidationError::MissingField("municipality"))?;

        let temperature = required(&self.temperature, "temperature", Celsius::parse)?;
        let ph = required(&self.ph, "ph", Ph::parse)?;

        let fertility = match optional(&self.fertility, "fertility", Percent::parse)? {
            Some(f) => f,
            None => {
                let derived = crate::agronomy::derive_soil_parameters(temperature);
                Percent::try_new(derived.fertility()).map_err(|source| {
                    ValidationError::InvalidValue {
                        field: "fertility",
                        source,
                    }
                })?
            }
        };

        let coordinates = self
            .coordinates
            .ok_or(ValidationError::MissingField("coordinates"))?;

        Ok(NewSample {
            owner_id: owner.clone(),
            municipality,
            location: self.location.trim().to_string(),
            coordinates,
            temperature,
            ph,
            fertility,
            point_scale: PointScale::for_temperature(temperature),
            nitrogen: optional(&self.nitrogen, "nitrogen", NutrientFraction::parse)?,
            phosphorus: optional(&self.phosphorus, "phosphorus", NutrientFraction::parse)?,
            potassium: optional(&self.potassium, "potassium", NutrientFraction::parse)?,
        })
    }

    /// Clear every field after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn required<T>(
    input: &str,
    field: &'static str,
    parse: fn(&str) -> Result<T, UnitError>,
) -> Result<T, ValidationError> {
    optional(input, field, parse)?.ok_or(ValidationError::MissingField(field))
}

fn optional<T>(
    input: &str,
    field: &'static str,
    parse: fn(&str) -> Result<T, UnitError>,
) -> Result<Option<T>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse(input)
        .map(Some)
        .map_err(|source| ValidationError::InvalidValue { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> SampleDraft {
        let mut draft = SampleDraft::new();
        draft
            .set_municipality(Municipality::Bucay)
            .set_location("Bucay Central", Municipality::Bucay.center());
        draft
    }

    #[test]
    fn test_temperature_prepopulates_derived_fields() {
        let mut draft = filled_draft();
        let derived = draft.set_temperature("28.5").unwrap();
        assert_eq!(derived.point_scale.value(), 4);
        assert_eq!(draft.ph_text(), "6.0");
        assert_eq!(draft.fertility_text(), "71");
    }

    #[test]
    fn test_unparseable_temperature_keeps_fields() {
        let mut draft = filled_draft();
        draft.set_temperature("20");
        assert!(draft.set_temperature("2x").is_none());
        assert_eq!(draft.ph_text(), "6.5");
        assert!(draft.derived().is_none());
    }

    #[test]
    fn test_user_override_survives_submit() {
        let mut draft = filled_draft();
        draft.set_temperature("22");
        draft.set_ph("5.1").set_fertility("40");

        let sample = draft.submit(&UserId::new("u1")).unwrap();
        assert_eq!(*sample.ph, 5.1);
        assert_eq!(*sample.fertility, 40.0);
        assert_eq!(sample.point_scale.value(), 5);
    }

    #[test]
    fn test_point_scale_uses_final_temperature() {
        let mut draft = filled_draft();
        draft.set_temperature("22");
        draft.set_ph("6.9");
        // Retyping the temperature re-derives, then the user overrides pH again
        draft.set_temperature("33");
        draft.set_ph("6.9");

        let sample = draft.submit(&UserId::new("u1")).unwrap();
        assert_eq!(sample.point_scale.value(), 3);
        assert_eq!(*sample.ph, 6.9);
        assert_eq!(*sample.fertility, 49.0);
    }

    #[test]
    fn test_required_fields() {
        let owner = UserId::new("u1");
        let mut draft = SampleDraft::new();
        assert_eq!(
            draft.submit(&owner),
            Err(ValidationError::MissingField("municipality"))
        );

        draft.set_municipality(Municipality::Sallapadan);
        assert_eq!(
            draft.submit(&owner),
            Err(ValidationError::MissingField("temperature"))
        );

        draft.set_temperature("25");
        draft.set_ph("");
        assert_eq!(draft.submit(&owner), Err(ValidationError::MissingField("ph")));

        draft.set_ph("7");
        assert_eq!(
            draft.submit(&owner),
            Err(ValidationError::MissingField("coordinates"))
        );
    }

    #[test]
    fn test_blank_fertility_falls_back_to_derived() {
        let mut draft = filled_draft();
        draft.set_temperature("36");
        draft.set_fertility("  ");
        let sample = draft.submit(&UserId::new("u1")).unwrap();
        assert_eq!(*sample.fertility, 21.0);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut draft = filled_draft();
        draft.set_temperature("25");
        draft.set_nitrogen("1.5");
        let err = draft.submit(&UserId::new("u1")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue {
                field: "nitrogen",
                ..
            }
        ));

        draft.set_nitrogen("0.2").set_ph("15");
        assert!(matches!(
            draft.submit(&UserId::new("u1")),
            Err(ValidationError::InvalidValue { field: "ph", .. })
        ));
    }

    #[test]
    fn test_reset_clears_form() {
        let mut draft = filled_draft();
        draft.set_temperature("25");
        draft.reset();
        assert_eq!(draft, SampleDraft::new());
    }
}
