//! Agronomic heuristics
//!
//! - Temperature-driven pH/fertility derivation and point-scale classification
//! - Legend classes used to color and label readings

pub mod legend;
pub mod soil_derivation;

pub use legend::{FertilityLevel, PhClass, TemperatureRange};
pub use soil_derivation::{
    derive_batch, derive_from_input, derive_soil_parameters, DerivedParameters, PointScale,
    SoilBand,
};
