//! Session repository port.
//!
//! Defines the contract for persisting and retrieving Session aggregates,
//! including the exclusive read-modify-write used by every operation that
//! rewrites topics.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{Session, SessionError};

/// Mutator run by [`SessionRepository::update_with`].
pub type SessionMutator<'a> = dyn FnMut(&mut Session) -> Result<(), SessionError> + Send + 'a;

/// Repository port for Session aggregate persistence.
///
/// Implementations must ensure:
/// - Updates of one session never interleave
/// - A failed `update_with` leaves the stored session unchanged
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a session with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Replace an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// All stored sessions, most recently updated first.
    async fn list(&self) -> Result<Vec<Session>, DomainError>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;

    /// Runs `mutator` with exclusive access to the session and persists
    /// the result only if it returns `Ok`.
    ///
    /// Returns the committed session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if session doesn't exist
    /// - whatever the mutator returns, with nothing persisted
    async fn update_with(
        &self,
        id: &SessionId,
        mutator: &mut SessionMutator<'_>,
    ) -> Result<Session, SessionError>;
}
