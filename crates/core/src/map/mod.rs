//! Map layer: sample markers and viewports
//!
//! The map library is an outer surface; this module owns the data it draws.
//! [`MarkerLayer`] keeps one [`Marker`] per sample and turns every fresh
//! sample list into a minimal set of [`MarkerPatch`]es, so a renderer only
//! touches markers that actually changed.

pub mod markers;
pub mod viewport;

pub use markers::{Marker, MarkerLayer, MarkerPatch, PopupContent};
pub use viewport::MapViewport;
