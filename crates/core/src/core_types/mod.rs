//! Core types and utilities

pub mod coordinates;
pub mod identity;
pub mod municipality;
pub mod units;

pub use coordinates::{CoordinateError, LngLat};
pub use identity::{SampleId, UserId};
pub use municipality::{Municipality, UnknownMunicipality};
pub use units::*;
