//! Semantic unit types for soil measurements
//!
//! Newtype wrappers keep a temperature from being passed where a pH is
//! expected and carry the valid range of each quantity with the value.
//!
//! # Design
//! - All quantities are stored as f64 (the values come straight from form input)
//! - Validated constructors (`try_new`) reject non-finite and out-of-range input
//! - Total ordering via `Ord` (`total_cmp`), so samples can be sorted by any quantity
//! - Serde support is transparent: a `Ph` serializes as a bare number
//!
//! # Usage
//! ```
//! use soil_health_core::core_types::units::{Celsius, Ph};
//!
//! let t = Celsius::parse(" 28.5 ").unwrap();
//! assert_eq!(*t, 28.5);
//!
//! assert!(Ph::try_new(6.5).is_ok());
//! assert!(Ph::try_new(14.5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// Errors raised when a raw number cannot become a unit value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Value was NaN or infinite
    #[error("{quantity} must be a finite number")]
    NonFinite {
        /// Name of the quantity being constructed
        quantity: &'static str,
    },
    /// Value lies outside the quantity's closed range
    #[error("{quantity} {value} is outside the range [{min}, {max}]")]
    OutOfRange {
        /// Name of the quantity being constructed
        quantity: &'static str,
        /// Offending value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// Text input could not be parsed as a number
    #[error("{quantity} '{input}' is not a number")]
    Unparseable {
        /// Name of the quantity being parsed
        quantity: &'static str,
        /// Text as entered
        input: String,
    },
}

/// Fold `-0.0` into `0.0` so derived `PartialEq` agrees with `total_cmp`.
#[inline]
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite { quantity });
    }
    if value < min || value > max {
        return Err(UnitError::OutOfRange {
            quantity,
            value,
            min,
            max,
        });
    }
    Ok(unsigned_zero(value))
}

fn parse_number(quantity: &'static str, input: &str) -> Result<f64, UnitError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| UnitError::Unparseable {
            quantity,
            input: input.to_string(),
        })
}

/// Implements the shared trait surface of a float newtype: total ordering,
/// `Deref` to the raw value, `Display` and conversion back to `f64`.
macro_rules! float_unit {
    ($name:ident, $suffix:expr) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }
    };
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Soil temperature in degrees Celsius
///
/// Any finite value is accepted, including negative readings and readings
/// above 40°C. This is the sole driver of the derived soil parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Celsius(f64);

float_unit!(Celsius, "°C");

impl Celsius {
    /// Create a temperature from a finite value.
    ///
    /// # Errors
    /// Returns [`UnitError::NonFinite`] for NaN or infinite input.
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        if value.is_finite() {
            Ok(Celsius(unsigned_zero(value)))
        } else {
            Err(UnitError::NonFinite {
                quantity: "temperature",
            })
        }
    }

    /// Parse a temperature as typed into a form field (surrounding whitespace allowed).
    ///
    /// # Errors
    /// Returns [`UnitError::Unparseable`] for non-numeric text and
    /// [`UnitError::NonFinite`] for `inf`/`NaN` spellings.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        Self::try_new(parse_number("temperature", input)?)
    }

    /// Raw value in °C
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Celsius {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

// ============================================================================
// SOIL CHEMISTRY
// ============================================================================

/// Soil pH on the 0-14 scale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Ph(f64);

float_unit!(Ph, "");

impl Ph {
    /// Lowest representable pH
    pub const MIN: f64 = 0.0;
    /// Highest representable pH
    pub const MAX: f64 = 14.0;

    /// Create a pH value.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the value is not finite or outside [0, 14].
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_range("pH", value, Self::MIN, Self::MAX).map(Ph)
    }

    /// Parse a pH value from form text.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the text is not a number or out of range.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        Self::try_new(parse_number("pH", input)?)
    }
}

impl TryFrom<f64> for Ph {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Percentage in [0, 100], used for overall fertility
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Percent(f64);

float_unit!(Percent, "%");

impl Percent {
    /// Create a percentage.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the value is not finite or outside [0, 100].
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_range("fertility", value, 0.0, 100.0).map(Percent)
    }

    /// Parse a percentage from form text.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the text is not a number or out of range.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        Self::try_new(parse_number("fertility", input)?)
    }
}

impl TryFrom<f64> for Percent {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Macro-nutrient content (N, P or K) as a fraction in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct NutrientFraction(f64);

float_unit!(NutrientFraction, "");

impl NutrientFraction {
    /// Create a nutrient fraction.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the value is not finite or outside [0, 1].
    pub fn try_new(value: f64) -> Result<Self, UnitError> {
        check_range("nutrient", value, 0.0, 1.0).map(NutrientFraction)
    }

    /// Parse a nutrient fraction from form text.
    ///
    /// # Errors
    /// Returns [`UnitError`] when the text is not a number or out of range.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        Self::try_new(parse_number("nutrient", input)?)
    }

    /// Value as a whole percentage for display (0.25 -> 25)
    pub fn as_display_percent(self) -> f64 {
        (self.0 * 100.0).round()
    }
}

impl TryFrom<f64> for NutrientFraction {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_equals_and_orders_as_zero() {
        let neg = Celsius::parse("-0").unwrap();
        let pos = Celsius::try_new(0.0).unwrap();
        assert_eq!(neg, pos);
        assert_eq!(neg.cmp(&pos), Ordering::Equal);
        assert!(neg.value().is_sign_positive());

        let ph = Ph::try_new(-0.0).unwrap();
        assert_eq!(ph.cmp(&Ph::try_new(0.0).unwrap()), Ordering::Equal);
        assert!(Percent::parse("-0.0").unwrap().is_sign_positive());
    }

    #[test]
    fn test_celsius_accepts_any_finite_value() {
        assert!(Celsius::try_new(-12.0).is_ok());
        assert!(Celsius::try_new(0.0).is_ok());
        assert!(Celsius::try_new(55.5).is_ok());
        assert_eq!(
            Celsius::try_new(f64::NAN),
            Err(UnitError::NonFinite {
                quantity: "temperature"
            })
        );
        assert!(Celsius::try_new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_celsius_parse_trims_and_rejects_garbage() {
        assert_eq!(*Celsius::parse("  28.5\n").unwrap(), 28.5);
        assert!(matches!(
            Celsius::parse("warm"),
            Err(UnitError::Unparseable { .. })
        ));
        assert!(Celsius::parse("").is_err());
        assert!(Celsius::parse("NaN").is_err());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(Ph::try_new(0.0).is_ok());
        assert!(Ph::try_new(14.0).is_ok());
        assert!(Ph::try_new(-0.1).is_err());
        assert!(Percent::try_new(100.0).is_ok());
        assert!(Percent::try_new(100.5).is_err());
        assert!(NutrientFraction::try_new(1.0).is_ok());
        assert!(NutrientFraction::try_new(1.01).is_err());
    }

    #[test]
    fn test_out_of_range_error_message() {
        let err = Ph::try_new(15.0).unwrap_err();
        assert_eq!(err.to_string(), "pH 15 is outside the range [0, 14]");
    }

    #[test]
    fn test_total_ordering() {
        let a = Ph::try_new(5.5).unwrap();
        let b = Ph::try_new(7.0).unwrap();
        assert_eq!(a.max(b), b);
        assert!(a < b);
    }

    #[test]
    fn test_serde_is_transparent_and_validating() {
        let json = serde_json::to_string(&Ph::try_new(6.5).unwrap()).unwrap();
        assert_eq!(json, "6.5");
        let bad: Result<Ph, _> = serde_json::from_str("20.0");
        assert!(bad.is_err());
    }

    #[test]
    fn test_nutrient_display_percent() {
        let n = NutrientFraction::try_new(0.25).unwrap();
        assert_eq!(n.as_display_percent(), 25.0);
    }
}
