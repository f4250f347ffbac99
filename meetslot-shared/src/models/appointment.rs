/// Appointment model
///
/// This module provides the Appointment record and its status enum.
/// An appointment books a half-open time window `[start_time, end_time)`
/// between two users: an organizer and a participant.
///
/// # Status Lifecycle
///
/// ```text
/// pending → confirmed → completed
///         → cancelled
/// ```
///
/// Appointments are created as `pending`. Only `cancelled` and `completed`
/// appointments release their time window; all other statuses count when
/// scanning for conflicting bookings.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE appointment_status AS ENUM (
///     'pending', 'confirmed', 'cancelled', 'completed'
/// );
///
/// CREATE TABLE appointments (
///     id BIGSERIAL PRIMARY KEY,
///     organizer_id BIGINT NOT NULL REFERENCES users(id),
///     participant_id BIGINT NOT NULL REFERENCES users(id),
///     start_time TIMESTAMPTZ NOT NULL,
///     end_time TIMESTAMPTZ NOT NULL,
///     description TEXT,
///     status appointment_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT appointments_interval_check CHECK (end_time > start_time),
///     CONSTRAINT appointments_distinct_users CHECK (organizer_id <> participant_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Newly created, awaiting confirmation
    Pending,

    /// Confirmed by the participant
    Confirmed,

    /// Cancelled; its time window is free again
    Cancelled,

    /// Took place; its time window is free again
    Completed,
}

impl AppointmentStatus {
    /// Converts status to string for display and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Whether this status still occupies its time window
    ///
    /// Active appointments participate in conflict scans; cancelled and
    /// completed ones do not.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    }
}

/// Persisted appointment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    /// Unique appointment ID, assigned on creation
    pub id: i64,

    /// User who booked the appointment
    pub organizer_id: i64,

    /// The other participant
    pub participant_id: i64,

    /// Start instant (inclusive)
    pub start_time: DateTime<Utc>,

    /// End instant (exclusive), strictly after `start_time`
    pub end_time: DateTime<Utc>,

    /// Optional free-text description
    pub description: Option<String>,

    /// Current status
    pub status: AppointmentStatus,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether this appointment overlaps the half-open window `[start, end)`
    ///
    /// Adjacent windows (one ending exactly where the other starts) do not
    /// overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Whether this appointment involves the given user in either role
    pub fn involves(&self, user_id: i64) -> bool {
        self.organizer_id == user_id || self.participant_id == user_id
    }
}

/// Candidate appointment, built by the booking service before insertion
///
/// Carries everything but the storage-assigned identifier and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    /// User who is booking
    pub organizer_id: i64,

    /// The other participant
    pub participant_id: i64,

    /// Start instant (inclusive)
    pub start_time: DateTime<Utc>,

    /// End instant (exclusive)
    pub end_time: DateTime<Utc>,

    /// Optional free-text description
    pub description: Option<String>,

    /// Status at creation; the booking service always sets `Pending`
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    fn appointment(start: DateTime<Utc>, end: DateTime<Utc>) -> Appointment {
        Appointment {
            id: 1,
            organizer_id: 1,
            participant_id: 2,
            start_time: start,
            end_time: end,
            description: None,
            status: AppointmentStatus::Pending,
            created_at: instant(0, 0),
            updated_at: instant(0, 0),
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(AppointmentStatus::Pending.as_str(), "pending");
        assert_eq!(AppointmentStatus::Confirmed.as_str(), "confirmed");
        assert_eq!(AppointmentStatus::Cancelled.as_str(), "cancelled");
        assert_eq!(AppointmentStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_is_active() {
        assert!(AppointmentStatus::Pending.is_active());
        assert!(AppointmentStatus::Confirmed.is_active());
        assert!(!AppointmentStatus::Cancelled.is_active());
        assert!(!AppointmentStatus::Completed.is_active());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let appt = appointment(instant(10, 0), instant(11, 0));

        // Overlapping window
        assert!(appt.overlaps(instant(10, 30), instant(11, 30)));
        // Contained window
        assert!(appt.overlaps(instant(10, 15), instant(10, 45)));
        // Adjacent windows touch but do not overlap
        assert!(!appt.overlaps(instant(11, 0), instant(12, 0)));
        assert!(!appt.overlaps(instant(9, 0), instant(10, 0)));
    }

    #[test]
    fn test_involves_either_role() {
        let appt = appointment(instant(10, 0), instant(11, 0));
        assert!(appt.involves(1));
        assert!(appt.involves(2));
        assert!(!appt.involves(3));
    }
}
