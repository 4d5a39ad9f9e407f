//! Sample workflow: submit, edit and delete on behalf of the signed-in user
//!
//! [`SampleService`] ties together a repository, the session context and the
//! in-flight registry:
//! - every write requires a signed-in user
//! - edits and deletes are restricted to the sample's owner
//! - only one write per sample id may be in progress at a time

use crate::core_types::{SampleId, UserId};
use crate::inflight::InFlightRegistry;
use crate::repository::{RepositoryError, SampleRepository};
use crate::sample::{SampleDraft, SampleUpdate, SoilSample, ValidationError};
use crate::session::SessionContext;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the sample workflow
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No user is signed in
    #[error("sign in to record or change soil samples")]
    NotSignedIn,
    /// The signed-in user does not own the sample
    #[error("sample {0} belongs to another user")]
    NotOwner(SampleId),
    /// Another write to the same sample is still in progress
    #[error("a change to sample {0} is already in progress")]
    WriteInFlight(SampleId),
    /// The update carries no changes
    #[error("nothing to update")]
    EmptyUpdate,
    /// The form did not validate
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The repository failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Sample workflow over a repository
#[derive(Debug)]
pub struct SampleService<R: SampleRepository> {
    repository: R,
    session: SessionContext,
    in_flight: InFlightRegistry,
}

impl<R: SampleRepository> SampleService<R> {
    /// Create a service acting for whoever is signed in to `session`
    pub fn new(repository: R, session: SessionContext) -> Self {
        Self {
            repository,
            session,
            in_flight: InFlightRegistry::new(),
        }
    }

    /// Underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Session this service acts for
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// In-flight registry guarding writes
    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    fn require_user(&self) -> Result<UserId, ServiceError> {
        self.session.current_user().ok_or(ServiceError::NotSignedIn)
    }

    /// Validate the draft and create a sample owned by the current user.
    ///
    /// # Errors
    /// [`ServiceError::NotSignedIn`], [`ServiceError::Validation`] or a
    /// repository failure.
    pub fn submit(&self, draft: &SampleDraft) -> Result<SampleId, ServiceError> {
        let user = self.require_user()?;
        let sample = draft.submit(&user)?;
        let municipality = sample.municipality;
        let id = self.repository.create(sample)?;
        info!("Recorded soil sample {} for {} by {}", id, municipality, user);
        Ok(id)
    }

    /// Apply an edit to a sample owned by the current user.
    ///
    /// # Errors
    /// [`ServiceError::NotSignedIn`], [`ServiceError::NotOwner`],
    /// [`ServiceError::WriteInFlight`], [`ServiceError::EmptyUpdate`] or a
    /// repository failure (including not found).
    pub fn edit(&self, id: SampleId, update: &SampleUpdate) -> Result<SoilSample, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        let user = self.require_user()?;
        let _guard = self.acquire(id)?;
        self.check_owner(id, &user)?;

        self.repository.update(id, update)?;
        info!("Updated soil sample {} by {}", id, user);
        Ok(self.repository.get(id)?)
    }

    /// Delete a sample owned by the current user.
    ///
    /// # Errors
    /// [`ServiceError::NotSignedIn`], [`ServiceError::NotOwner`],
    /// [`ServiceError::WriteInFlight`] or a repository failure.
    pub fn remove(&self, id: SampleId) -> Result<(), ServiceError> {
        let user = self.require_user()?;
        let _guard = self.acquire(id)?;
        self.check_owner(id, &user)?;

        self.repository.delete(id)?;
        info!("Deleted soil sample {} by {}", id, user);
        Ok(())
    }

    /// All samples, ordered by id.
    ///
    /// # Errors
    /// Propagates repository failures.
    pub fn samples(&self) -> Result<Vec<SoilSample>, ServiceError> {
        Ok(self.repository.list_all()?)
    }

    fn acquire(&self, id: SampleId) -> Result<crate::inflight::InFlightGuard, ServiceError> {
        self.in_flight.try_acquire(id).ok_or_else(|| {
            warn!("Rejected concurrent write to sample {}", id);
            ServiceError::WriteInFlight(id)
        })
    }

    fn check_owner(&self, id: SampleId, user: &UserId) -> Result<(), ServiceError> {
        let existing = self.repository.get(id)?;
        if existing.is_owned_by(user) {
            Ok(())
        } else {
            warn!("User {} attempted to modify sample {} owned by {}", user, id, existing.owner_id);
            Err(ServiceError::NotOwner(id))
        }
    }
}
