/// Storage contracts for MeetSlot
///
/// This module defines the ports the booking and user services depend on,
/// plus their adapters:
///
/// - `UserDirectory`: user lookup and creation with email uniqueness
/// - `AppointmentStore`: transactional conflict scan and insert
/// - `postgres`: production adapters backed by sqlx/Postgres
/// - `memory`: in-memory fake for service-level tests
///
/// Both ports distinguish "not found" (`Ok(None)`) from "lookup failed"
/// (`Err`); callers map the two to different outward behavior.
///
/// The appointment store exposes an explicit transaction handle (`Txn`)
/// rather than ambient transaction state, so the conflict scan and the
/// insert that follows it are always mutually consistent and the services
/// stay testable against the in-memory adapter.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::appointment::{Appointment, NewAppointment};
use crate::models::user::{NewUser, User};

/// Error type for unexpected persistence failures
///
/// Covers everything that is not a domain outcome: connection loss, query
/// failures, constraint violations not otherwise classified.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database driver failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure reported by a non-SQL backend (in-memory adapter, tests)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Error type for user directory writes
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A user with this email already exists
    #[error("email already exists")]
    DuplicateEmail,

    /// Unexpected persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User directory port
///
/// Stores user identity records, resolves them by id or email, and
/// enforces email uniqueness. No side effects beyond persistence.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches a user by identifier
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only on unexpected persistence failure; a
    /// missing user is `Ok(None)`.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Fetches a user by email address
    ///
    /// # Errors
    ///
    /// Same semantics as [`UserDirectory::find_by_id`].
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new user and returns it with its assigned identifier
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateEmail`] if the email is already
    /// present, [`DirectoryError::Store`] on any other failure.
    async fn create(&self, data: NewUser) -> Result<User, DirectoryError>;
}

/// Appointment store port
///
/// Persists appointments and supports the conflict-scan + insert pair the
/// booking service runs inside one transaction scope.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Transaction handle scoping one conflict scan and insert
    ///
    /// Exclusively owned by a single in-flight creation call. Dropping the
    /// handle without committing must roll back, so a cancelled caller
    /// never leaves a partial appointment visible.
    type Txn: Send;

    /// Opens a new transaction scope
    async fn begin(&self) -> Result<Self::Txn, StoreError>;

    /// Returns every existing appointment conflicting with `candidate`
    ///
    /// A conflict is an appointment that involves the candidate's organizer
    /// or participant in either role, has a status that still occupies its
    /// window, and overlaps the candidate's half-open `[start, end)`
    /// interval. An empty result means the slot is free. Ordering of the
    /// result is unspecified.
    ///
    /// Implementations must ensure the scan serializes against concurrent
    /// creations touching the same users, so that two overlapping requests
    /// cannot both observe an empty result (write skew).
    async fn find_conflicts(
        &self,
        txn: &mut Self::Txn,
        candidate: &NewAppointment,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Persists `candidate` within the transaction
    ///
    /// Returns the stored record with its assigned identifier and
    /// timestamps. The row only becomes visible to other transactions
    /// after [`AppointmentStore::commit`].
    async fn insert(
        &self,
        txn: &mut Self::Txn,
        candidate: NewAppointment,
    ) -> Result<Appointment, StoreError>;

    /// Commits the transaction
    ///
    /// A failed commit must leave no partial state behind.
    async fn commit(&self, txn: Self::Txn) -> Result<(), StoreError>;

    /// Rolls the transaction back, discarding staged writes
    async fn rollback(&self, txn: Self::Txn) -> Result<(), StoreError>;

    /// Fetches an appointment by identifier, outside any transaction
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only on unexpected persistence failure; a
    /// missing appointment is `Ok(None)`.
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError>;
}
