//! Temperature-driven soil parameter derivation
//!
//! Maps a measured soil temperature to a default pH, a default fertility
//! percentage and a 1-5 point-scale classification. Soil conditions are best
//! in a moderate band (20-25°C) and degrade toward both extremes.
//!
//! | Band      | Temperature (°C)   | Scale | pH                  | Fertility (%)        |
//! |-----------|--------------------|-------|---------------------|----------------------|
//! | Ideal     | [20, 25]           | 5     | 6.5 + (t-20) × 0.2  | 81 + (t-20) × 3.8    |
//! | Good      | [26, 30]           | 4     | 5.5 + (t-26) × 0.18 | 61 + (t-26) × 3.8    |
//! | Warm      | [31, 35]           | 3     | 4.5 + (t-31) × 0.18 | 41 + (t-31) × 3.8    |
//! | Hot       | [36, 40]           | 2     | 4.0 + (t-36) × 0.08 | 21 + (t-36) × 3.8    |
//! | Stressful | everything else    | 1     | 3.5                 | 10                   |
//!
//! Band edges are inclusive integers. Readings strictly between two bands
//! (25 < t < 26, 30 < t < 31, 35 < t < 36) match no band and fall through to
//! Stressful. This is the established behavior and is locked in by tests.

use crate::core_types::units::{Celsius, UnitError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Band edges and interpolation coefficients
pub mod bands {
    use std::ops::RangeInclusive;

    /// Ideal band `[20, 25]`
    pub const IDEAL: RangeInclusive<f64> = 20.0..=25.0;
    /// Good band `[26, 30]`
    pub const GOOD: RangeInclusive<f64> = 26.0..=30.0;
    /// Warm band `[31, 35]`
    pub const WARM: RangeInclusive<f64> = 31.0..=35.0;
    /// Hot band `[36, 40]`
    pub const HOT: RangeInclusive<f64> = 36.0..=40.0;

    /// Fertility gained per degree inside every interpolated band
    pub const FERTILITY_SLOPE: f64 = 3.8;

    /// pH reported outside every band
    pub const STRESSFUL_PH: f64 = 3.5;
    /// Fertility reported outside every band
    pub const STRESSFUL_FERTILITY: f64 = 10.0;
}

/// Temperature band a reading falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilBand {
    /// 20-25°C, most favorable
    Ideal,
    /// 26-30°C
    Good,
    /// 31-35°C
    Warm,
    /// 36-40°C
    Hot,
    /// Below 20°C, above 40°C, or between band edges
    Stressful,
}

impl SoilBand {
    /// Classify a temperature using the literal inclusive band edges
    pub fn classify(temperature: Celsius) -> Self {
        let t = temperature.value();
        if bands::IDEAL.contains(&t) {
            SoilBand::Ideal
        } else if bands::GOOD.contains(&t) {
            SoilBand::Good
        } else if bands::WARM.contains(&t) {
            SoilBand::Warm
        } else if bands::HOT.contains(&t) {
            SoilBand::Hot
        } else {
            SoilBand::Stressful
        }
    }

    /// Point-scale classification of this band
    pub fn point_scale(self) -> PointScale {
        match self {
            SoilBand::Ideal => PointScale(5),
            SoilBand::Good => PointScale(4),
            SoilBand::Warm => PointScale(3),
            SoilBand::Hot => PointScale(2),
            SoilBand::Stressful => PointScale(1),
        }
    }

    /// Temperature range of the band, `None` for the catch-all band
    pub fn range(self) -> Option<RangeInclusive<f64>> {
        match self {
            SoilBand::Ideal => Some(bands::IDEAL),
            SoilBand::Good => Some(bands::GOOD),
            SoilBand::Warm => Some(bands::WARM),
            SoilBand::Hot => Some(bands::HOT),
            SoilBand::Stressful => None,
        }
    }

    /// (pH at band start, pH per degree) for interpolated bands
    fn ph_line(self) -> Option<(f64, f64)> {
        match self {
            SoilBand::Ideal => Some((6.5, 0.2)),
            SoilBand::Good => Some((5.5, 0.18)),
            SoilBand::Warm => Some((4.5, 0.18)),
            SoilBand::Hot => Some((4.0, 0.08)),
            SoilBand::Stressful => None,
        }
    }

    /// Fertility at band start for interpolated bands
    fn fertility_base(self) -> Option<f64> {
        match self {
            SoilBand::Ideal => Some(81.0),
            SoilBand::Good => Some(61.0),
            SoilBand::Warm => Some(41.0),
            SoilBand::Hot => Some(21.0),
            SoilBand::Stressful => None,
        }
    }
}

impl fmt::Display for SoilBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoilBand::Ideal => "Ideal",
            SoilBand::Good => "Good",
            SoilBand::Warm => "Warm",
            SoilBand::Hot => "Hot",
            SoilBand::Stressful => "Stressful",
        };
        f.write_str(name)
    }
}

/// Ordinal soil-condition score, 5 = most favorable, 1 = most stressful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PointScale(u8);

impl PointScale {
    /// Lowest score
    pub const MIN: PointScale = PointScale(1);
    /// Highest score
    pub const MAX: PointScale = PointScale(5);

    /// Raw score
    pub fn value(self) -> u8 {
        self.0
    }

    /// Score for a temperature. Always computed from temperature alone.
    pub fn for_temperature(temperature: Celsius) -> Self {
        SoilBand::classify(temperature).point_scale()
    }
}

impl TryFrom<u8> for PointScale {
    type Error = UnitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(PointScale(value))
        } else {
            Err(UnitError::OutOfRange {
                quantity: "point scale",
                value: f64::from(value),
                min: 1.0,
                max: 5.0,
            })
        }
    }
}

impl From<PointScale> for u8 {
    fn from(p: PointScale) -> u8 {
        p.0
    }
}

impl fmt::Display for PointScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Output of the derivation
///
/// `raw_ph`/`raw_fertility` are the unrounded interpolated values and are the
/// basis for any recomputation. `ph()`/`fertility()` give display precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    /// Band the temperature fell into
    pub band: SoilBand,
    /// Interpolated pH before rounding
    pub raw_ph: f64,
    /// Interpolated fertility (%) before rounding
    pub raw_fertility: f64,
    /// Classification of the temperature
    pub point_scale: PointScale,
}

impl DerivedParameters {
    /// pH rounded to one decimal place
    pub fn ph(&self) -> f64 {
        round_to(self.raw_ph, 1)
    }

    /// Fertility rounded to a whole percentage
    pub fn fertility(&self) -> f64 {
        round_to(self.raw_fertility, 0)
    }
}

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Derive default soil parameters from a measured temperature
///
/// Pure and deterministic: identical input always gives bit-identical output.
/// The temperature must already be validated as finite, which `Celsius`
/// guarantees through its constructors.
pub fn derive_soil_parameters(temperature: Celsius) -> DerivedParameters {
    let band = SoilBand::classify(temperature);
    let t = temperature.value();

    let (raw_ph, raw_fertility) = match (band.range(), band.ph_line(), band.fertility_base()) {
        (Some(range), Some((ph_base, ph_slope)), Some(fertility_base)) => {
            let offset = t - range.start();
            (
                ph_base + offset * ph_slope,
                fertility_base + offset * bands::FERTILITY_SLOPE,
            )
        }
        _ => (bands::STRESSFUL_PH, bands::STRESSFUL_FERTILITY),
    };

    DerivedParameters {
        band,
        raw_ph,
        raw_fertility,
        point_scale: band.point_scale(),
    }
}

/// Parse a temperature as typed and derive from it
///
/// # Errors
/// Returns [`UnitError`] when the text is empty, non-numeric or non-finite;
/// derivation is never attempted in that case.
pub fn derive_from_input(input: &str) -> Result<DerivedParameters, UnitError> {
    Celsius::parse(input).map(derive_soil_parameters)
}

/// Derive for many readings in parallel, preserving input order
pub fn derive_batch(temperatures: &[Celsius]) -> Vec<DerivedParameters> {
    temperatures
        .par_iter()
        .map(|&t| derive_soil_parameters(t))
        .collect()
}
