//! Soil Health Dashboard Core Library
//!
//! Field soil records for the municipalities of Abra province. A measured soil
//! temperature drives the derived pH, fertility and point-scale classification;
//! records are assembled from an entry form, stored through a repository and
//! shown on a dashboard and map.
//!
//! ## Layout
//!
//! - [`agronomy`]: temperature-to-soil-parameter derivation and legend classes
//! - [`sample`]: sample records, entry form and partial updates
//! - [`repository`]: storage contract with in-memory and JSON-file stores
//! - [`session`]: explicit authenticated-session context
//! - [`service`]: owner-checked sample workflow with per-record write exclusion
//! - [`statistics`], [`map`], [`export`]: dashboard views over the sample list
//! - [`config`]: dashboard settings

// Core types and utilities
pub mod core_types;

pub mod agronomy;
pub mod config;
pub mod export;
pub mod inflight;
pub mod map;
pub mod repository;
pub mod sample;
pub mod service;
pub mod session;
pub mod statistics;

// Re-export core types
pub use core_types::{
    Celsius, LngLat, Municipality, NutrientFraction, Percent, Ph, SampleId, UnitError, UserId,
};

pub use agronomy::{
    derive_batch, derive_from_input, derive_soil_parameters, DerivedParameters, FertilityLevel,
    PhClass, PointScale, SoilBand, TemperatureRange,
};
pub use config::{ConfigError, DashboardConfig};
pub use export::{export_csv, export_json, ExportError};
pub use map::{MapViewport, Marker, MarkerLayer, MarkerPatch, PopupContent};
pub use repository::{InMemoryRepository, JsonFileRepository, RepositoryError, SampleRepository};
pub use sample::{NewSample, SampleDraft, SampleUpdate, SoilSample, ValidationError};
pub use service::{SampleService, ServiceError};
pub use session::{AuthEvent, DayPeriod, SessionContext, SubscriptionId, UserSession};
pub use statistics::DashboardStats;
