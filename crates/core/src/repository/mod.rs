//! Sample persistence boundary
//!
//! The dashboard stores samples in a hosted backend. [`SampleRepository`] is
//! the narrow interface the rest of the crate depends on; the backend client
//! lives behind it. Two local implementations are provided:
//!
//! - [`InMemoryRepository`] for tests and ephemeral sessions
//! - [`JsonFileRepository`] persisting the whole store as one JSON document

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;

use crate::core_types::SampleId;
use crate::sample::{NewSample, SampleUpdate, SoilSample};
use thiserror::Error;

/// Errors reported by a repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No sample with this id
    #[error("sample {0} not found")]
    NotFound(SampleId),
    /// Reading or writing the backing store failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing store holds malformed data
    #[error("failed to parse stored samples: {0}")]
    Parse(String),
    /// Samples could not be serialized
    #[error("failed to serialize samples: {0}")]
    Serialize(String),
    /// Every sample id has been handed out
    #[error("no sample ids left")]
    IdsExhausted,
    /// Internal lock was poisoned by a panic in another thread
    #[error("repository lock poisoned")]
    LockPoisoned,
}

/// Storage for soil samples
///
/// Implementations are shared between threads; every method takes `&self`.
pub trait SampleRepository: Send + Sync {
    /// Persist a new sample and return its assigned id.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] if the write fails.
    fn create(&self, sample: NewSample) -> Result<SampleId, RepositoryError>;

    /// Apply a partial update to an existing sample.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] for unknown ids, or a storage error.
    fn update(&self, id: SampleId, update: &SampleUpdate) -> Result<(), RepositoryError>;

    /// Remove a sample.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] for unknown ids, or a storage error.
    fn delete(&self, id: SampleId) -> Result<(), RepositoryError>;

    /// Fetch one sample.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] for unknown ids.
    fn get(&self, id: SampleId) -> Result<SoilSample, RepositoryError>;

    /// All samples ordered by id.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] if the store cannot be read.
    fn list_all(&self) -> Result<Vec<SoilSample>, RepositoryError>;
}
