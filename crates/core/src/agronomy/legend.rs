//! Legend classes for soil readings
//!
//! Each class carries its display label and the marker color used on the map.
//! Ranges use inclusive lower bound and exclusive upper bound unless stated.

use crate::agronomy::soil_derivation::{bands, SoilBand};
use crate::core_types::units::{Celsius, Percent, Ph};
use serde::{Deserialize, Serialize};

/// pH classification used to color map markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhClass {
    /// pH < 5.5
    StronglyAcidic,
    /// 5.5 <= pH < 6.0
    ModeratelyAcidic,
    /// 6.0 <= pH < 6.5
    SlightlyAcidic,
    /// 6.5 <= pH <= 7.5
    Optimal,
    /// pH > 7.5
    Alkaline,
}

impl PhClass {
    /// Classify a pH reading
    pub fn classify(ph: Ph) -> Self {
        let v = *ph;
        if v < 5.5 {
            PhClass::StronglyAcidic
        } else if v < 6.0 {
            PhClass::ModeratelyAcidic
        } else if v < 6.5 {
            PhClass::SlightlyAcidic
        } else if v > 7.5 {
            PhClass::Alkaline
        } else {
            PhClass::Optimal
        }
    }

    /// Marker fill color (CSS hsl)
    pub fn marker_color(self) -> &'static str {
        match self {
            PhClass::StronglyAcidic => "hsl(0 70% 50%)",
            PhClass::ModeratelyAcidic => "hsl(25 85% 55%)",
            PhClass::SlightlyAcidic => "hsl(45 95% 50%)",
            PhClass::Optimal => "hsl(130 45% 40%)",
            PhClass::Alkaline => "hsl(210 80% 50%)",
        }
    }

    /// Legend label
    pub fn label(self) -> &'static str {
        match self {
            PhClass::StronglyAcidic => "Strongly Acidic",
            PhClass::ModeratelyAcidic => "Moderately Acidic",
            PhClass::SlightlyAcidic => "Slightly Acidic",
            PhClass::Optimal => "Optimal",
            PhClass::Alkaline => "Alkaline",
        }
    }

    /// Stable code for FFI
    pub fn as_i32(self) -> i32 {
        match self {
            PhClass::StronglyAcidic => 0,
            PhClass::ModeratelyAcidic => 1,
            PhClass::SlightlyAcidic => 2,
            PhClass::Optimal => 3,
            PhClass::Alkaline => 4,
        }
    }
}

/// Temperature legend class
///
/// The inner classes reuse the derivation band edges, so a reading labelled
/// "Good" is exactly one that derives a point scale of 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureRange {
    /// Below 20°C
    Cool,
    /// 20-25°C
    Ideal,
    /// 26-30°C
    Good,
    /// 31-35°C
    Warm,
    /// Above 35°C
    Hot,
    /// Between integer band edges (e.g. 25.5°C)
    Unbanded,
}

impl TemperatureRange {
    /// Classify a temperature reading
    pub fn classify(temperature: Celsius) -> Self {
        let t = temperature.value();
        match SoilBand::classify(temperature) {
            SoilBand::Ideal => TemperatureRange::Ideal,
            SoilBand::Good => TemperatureRange::Good,
            SoilBand::Warm => TemperatureRange::Warm,
            SoilBand::Hot => TemperatureRange::Hot,
            SoilBand::Stressful if t < *bands::IDEAL.start() => TemperatureRange::Cool,
            SoilBand::Stressful if t > *bands::HOT.end() => TemperatureRange::Hot,
            SoilBand::Stressful => TemperatureRange::Unbanded,
        }
    }

    /// Legend label
    pub fn label(self) -> &'static str {
        match self {
            TemperatureRange::Cool => "Cool (< 20°C)",
            TemperatureRange::Ideal => "Ideal (20-25°C)",
            TemperatureRange::Good => "Good (26-30°C)",
            TemperatureRange::Warm => "Warm (31-35°C)",
            TemperatureRange::Hot => "Hot (> 35°C)",
            TemperatureRange::Unbanded => "Between bands",
        }
    }
}

/// Fertility legend class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilityLevel {
    /// Below 40%
    VeryLow,
    /// 40-60%
    Low,
    /// 60-70%
    Moderate,
    /// 70-85%
    High,
    /// Above 85%
    VeryHigh,
}

impl FertilityLevel {
    /// Classify a fertility percentage
    pub fn classify(fertility: Percent) -> Self {
        let f = *fertility;
        if f < 40.0 {
            FertilityLevel::VeryLow
        } else if f < 60.0 {
            FertilityLevel::Low
        } else if f < 70.0 {
            FertilityLevel::Moderate
        } else if f <= 85.0 {
            FertilityLevel::High
        } else {
            FertilityLevel::VeryHigh
        }
    }

    /// Legend label
    pub fn label(self) -> &'static str {
        match self {
            FertilityLevel::VeryLow => "Very Low (< 40%)",
            FertilityLevel::Low => "Low (40-60%)",
            FertilityLevel::Moderate => "Moderate (60-70%)",
            FertilityLevel::High => "High (70-85%)",
            FertilityLevel::VeryHigh => "Very High (> 85%)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph(v: f64) -> Ph {
        Ph::try_new(v).unwrap()
    }

    fn celsius(v: f64) -> Celsius {
        Celsius::try_new(v).unwrap()
    }

    #[test]
    fn test_ph_marker_classes() {
        assert_eq!(PhClass::classify(ph(5.4)), PhClass::StronglyAcidic);
        assert_eq!(PhClass::classify(ph(5.5)), PhClass::ModeratelyAcidic);
        assert_eq!(PhClass::classify(ph(6.0)), PhClass::SlightlyAcidic);
        assert_eq!(PhClass::classify(ph(6.5)), PhClass::Optimal);
        assert_eq!(PhClass::classify(ph(7.5)), PhClass::Optimal);
        assert_eq!(PhClass::classify(ph(7.6)), PhClass::Alkaline);
        assert_eq!(PhClass::Optimal.marker_color(), "hsl(130 45% 40%)");
    }

    #[test]
    fn test_temperature_ranges_follow_bands() {
        assert_eq!(TemperatureRange::classify(celsius(15.0)), TemperatureRange::Cool);
        assert_eq!(TemperatureRange::classify(celsius(22.0)), TemperatureRange::Ideal);
        assert_eq!(TemperatureRange::classify(celsius(28.0)), TemperatureRange::Good);
        assert_eq!(TemperatureRange::classify(celsius(33.0)), TemperatureRange::Warm);
        assert_eq!(TemperatureRange::classify(celsius(38.0)), TemperatureRange::Hot);
        assert_eq!(TemperatureRange::classify(celsius(45.0)), TemperatureRange::Hot);
        assert_eq!(TemperatureRange::classify(celsius(25.5)), TemperatureRange::Unbanded);
        assert_eq!(TemperatureRange::classify(celsius(35.5)), TemperatureRange::Unbanded);
    }

    #[test]
    fn test_fertility_levels() {
        let level = |v: f64| FertilityLevel::classify(Percent::try_new(v).unwrap());
        assert_eq!(level(10.0), FertilityLevel::VeryLow);
        assert_eq!(level(40.0), FertilityLevel::Low);
        assert_eq!(level(65.0), FertilityLevel::Moderate);
        assert_eq!(level(75.0), FertilityLevel::High);
        assert_eq!(level(85.0), FertilityLevel::High);
        assert_eq!(level(90.0), FertilityLevel::VeryHigh);
    }
}
