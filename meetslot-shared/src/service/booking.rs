/// Booking service: appointment creation with conflict detection
///
/// This module implements the creation protocol that keeps the overlap
/// invariant: an appointment's `[start, end)` window must not overlap any
/// other active appointment involving either participant.
///
/// # Creation protocol
///
/// 1. Reject self-booking (organizer == participant) — no storage touched.
/// 2. Parse both instants as RFC 3339 — before the transaction opens.
/// 3. Reject empty or reversed intervals (`end <= start`).
/// 4. Open one transaction scope.
/// 5. Resolve organizer, then participant; absence or a failed lookup
///    rolls back and reports the participant as missing.
/// 6. Scan for conflicting appointments inside the transaction; any hit
///    rolls back. The scan and the insert share the transaction so that
///    two concurrent requests cannot both observe a free slot — the store
///    serializes creations touching the same user.
/// 7. Insert the candidate, commit, return the persisted record.
///
/// Every failure path after step 4 rolls the transaction back before
/// returning; rollback failures are logged and never mask the primary
/// error.
///
/// # Example
///
/// ```
/// use meetslot_shared::service::booking::{BookingService, CreateAppointment};
/// use meetslot_shared::store::memory::MemoryStore;
/// use meetslot_shared::store::UserDirectory;
/// use meetslot_shared::models::user::NewUser;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let alice = store.create(NewUser {
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     role: "member".to_string(),
/// }).await?;
/// let bob = store.create(NewUser {
///     name: "Bob".to_string(),
///     email: "bob@example.com".to_string(),
///     role: "member".to_string(),
/// }).await?;
///
/// let service = BookingService::new(store.clone(), store);
/// let appointment = service.create_appointment(CreateAppointment {
///     organizer_id: alice.id,
///     participant_id: bob.id,
///     start_time: "2024-01-01T10:00:00Z".to_string(),
///     end_time: "2024-01-01T11:00:00Z".to_string(),
///     description: None,
/// }).await?;
/// println!("Booked appointment {}", appointment.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::store::{AppointmentStore, StoreError, UserDirectory};

/// Input for creating an appointment
///
/// The instants arrive as raw RFC 3339 strings; parsing them is part of
/// the creation protocol so a malformed timestamp is reported with the
/// field that carried it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    /// User booking the appointment
    pub organizer_id: i64,

    /// The other participant
    pub participant_id: i64,

    /// Start instant, RFC 3339 (e.g. `2024-01-01T10:00:00Z`)
    pub start_time: String,

    /// End instant, RFC 3339, strictly after `start_time`
    pub end_time: String,

    /// Optional free-text description
    pub description: Option<String>,
}

/// Error type for booking operations
///
/// Each failure of the creation protocol has its own kind so the
/// transport layer maps outcomes exhaustively instead of comparing
/// sentinel values.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Organizer and participant are the same user
    #[error("user cannot book an appointment with themselves")]
    SelfBooking,

    /// A timestamp field failed to parse
    #[error("invalid {field}, expected an RFC 3339 timestamp (e.g. 2024-01-01T10:00:00Z)")]
    InvalidTimeFormat {
        /// Which input field failed (`start_time` or `end_time`)
        field: &'static str,
    },

    /// The interval is empty or reversed
    #[error("end time must be strictly after start time")]
    InvalidInterval,

    /// Organizer or participant does not exist
    #[error("organizer or participant not found")]
    ParticipantNotFound,

    /// The slot overlaps existing active appointments
    #[error("time slot conflicts with an existing appointment for one of the participants")]
    Conflict {
        /// Identifiers of the conflicting appointments, for diagnostics
        ids: Vec<i64>,
    },

    /// The insert failed after a clean conflict scan
    #[error("failed to create appointment")]
    CreateFailed(#[source] StoreError),

    /// The commit failed; no appointment was persisted
    #[error("failed to commit appointment")]
    CommitFailed(#[source] StoreError),

    /// Lookup target does not exist
    #[error("appointment not found")]
    NotFound,

    /// Unexpected persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Booking service
///
/// Generic over its storage dependencies; construct with
/// [`BookingService::new`] (dependency injection by parameter, no ambient
/// state).
#[derive(Debug, Clone)]
pub struct BookingService<D, S> {
    directory: D,
    store: S,
}

impl<D, S> BookingService<D, S>
where
    D: UserDirectory,
    S: AppointmentStore,
{
    /// Creates a booking service over the given directory and store
    pub fn new(directory: D, store: S) -> Self {
        Self { directory, store }
    }

    /// Creates an appointment, enforcing the no-overlap invariant
    ///
    /// Runs the creation protocol described in the module docs. The
    /// conflict scan and insert share one transaction scope; on every
    /// failure after the transaction opens, the transaction is rolled
    /// back before the error is returned.
    ///
    /// # Errors
    ///
    /// - [`BookingError::SelfBooking`] if organizer equals participant
    /// - [`BookingError::InvalidTimeFormat`] if an instant fails to parse
    /// - [`BookingError::InvalidInterval`] if `end <= start`
    /// - [`BookingError::ParticipantNotFound`] if either user is missing
    ///   or its lookup failed
    /// - [`BookingError::Conflict`] if the slot overlaps active
    ///   appointments of either participant
    /// - [`BookingError::CreateFailed`] / [`BookingError::CommitFailed`] /
    ///   [`BookingError::Store`] on persistence failures
    pub async fn create_appointment(
        &self,
        req: CreateAppointment,
    ) -> Result<Appointment, BookingError> {
        // Stateless validations run before any storage is touched.
        if req.organizer_id == req.participant_id {
            return Err(BookingError::SelfBooking);
        }
        let start_time = parse_instant(&req.start_time, "start_time")?;
        let end_time = parse_instant(&req.end_time, "end_time")?;
        if end_time <= start_time {
            return Err(BookingError::InvalidInterval);
        }

        let candidate = NewAppointment {
            organizer_id: req.organizer_id,
            participant_id: req.participant_id,
            start_time,
            end_time,
            description: req.description,
            status: AppointmentStatus::Pending,
        };

        let mut txn = self.store.begin().await?;

        if !self.user_exists(req.organizer_id).await {
            self.abort(txn).await;
            return Err(BookingError::ParticipantNotFound);
        }
        if !self.user_exists(req.participant_id).await {
            self.abort(txn).await;
            return Err(BookingError::ParticipantNotFound);
        }

        let conflicts = match self.store.find_conflicts(&mut txn, &candidate).await {
            Ok(conflicts) => conflicts,
            Err(err) => {
                error!(error = %err, "conflict scan failed");
                self.abort(txn).await;
                return Err(BookingError::Store(err));
            }
        };
        if !conflicts.is_empty() {
            let ids: Vec<i64> = conflicts.iter().map(|appointment| appointment.id).collect();
            warn!(conflicting_ids = ?ids, "conflicting appointments found");
            self.abort(txn).await;
            return Err(BookingError::Conflict { ids });
        }

        let created = match self.store.insert(&mut txn, candidate).await {
            Ok(appointment) => appointment,
            Err(err) => {
                error!(error = %err, "failed to insert appointment");
                self.abort(txn).await;
                return Err(BookingError::CreateFailed(err));
            }
        };

        if let Err(err) = self.store.commit(txn).await {
            // The store guarantees a failed commit leaves nothing behind.
            error!(error = %err, "failed to commit appointment transaction");
            return Err(BookingError::CommitFailed(err));
        }

        Ok(created)
    }

    /// Fetches an appointment by identifier
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if no appointment has this id
    /// - [`BookingError::Store`] if the lookup itself failed
    pub async fn get_appointment(&self, id: i64) -> Result<Appointment, BookingError> {
        match self.store.find_by_id(id).await {
            Ok(Some(appointment)) => Ok(appointment),
            Ok(None) => Err(BookingError::NotFound),
            Err(err) => {
                error!(appointment_id = id, error = %err, "failed to fetch appointment");
                Err(BookingError::Store(err))
            }
        }
    }

    async fn user_exists(&self, id: i64) -> bool {
        match self.directory.find_by_id(id).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(err) => {
                // A failed lookup is reported like an absent user; the
                // underlying error is kept visible for operators.
                warn!(user_id = id, error = %err, "user lookup failed during appointment creation");
                false
            }
        }
    }

    async fn abort(&self, txn: S::Txn) {
        if let Err(err) = self.store.rollback(txn).await {
            warn!(error = %err, "failed to roll back appointment transaction");
        }
    }
}

fn parse_instant(value: &str, field: &'static str) -> Result<DateTime<Utc>, BookingError> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| {
            warn!(field, value, error = %err, "failed to parse timestamp");
            BookingError::InvalidTimeFormat { field }
        })
}
