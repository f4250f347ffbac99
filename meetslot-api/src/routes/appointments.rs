/// Appointment endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/appointments` - Book an appointment
/// - `GET  /api/v1/appointments/:id` - Get an appointment by id

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use meetslot_shared::models::appointment::Appointment;
use meetslot_shared::service::booking::CreateAppointment;
use serde::Deserialize;
use validator::Validate;

/// Create appointment request
///
/// The instants are RFC 3339 strings; the booking service parses them and
/// reports the failing field on malformed input.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    /// User booking the appointment
    pub organizer_id: i64,

    /// The other participant
    pub participant_id: i64,

    /// Start instant, RFC 3339 (e.g. "2024-01-01T10:00:00Z")
    #[validate(length(min = 1, message = "Start time must not be empty"))]
    pub start_time: String,

    /// End instant, RFC 3339, strictly after start_time
    #[validate(length(min = 1, message = "End time must not be empty"))]
    pub end_time: String,

    /// Optional free-text description
    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,
}

/// Book an appointment
///
/// Runs the conflict-checked creation protocol: the slot is persisted only
/// if it overlaps no active appointment of either participant.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/appointments
/// Content-Type: application/json
///
/// {
///   "organizer_id": 1,
///   "participant_id": 2,
///   "start_time": "2024-01-01T10:00:00Z",
///   "end_time": "2024-01-01T11:00:00Z",
///   "description": "Kickoff"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed instant, empty/reversed interval, or
///   self-booking
/// - `404 Not Found`: Organizer or participant does not exist
/// - `409 Conflict`: The slot overlaps an existing appointment
/// - `500 Internal Server Error`: Server error
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<CreateAppointmentRequest>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    req.validate()?;

    let appointment = state
        .booking
        .create_appointment(CreateAppointment {
            organizer_id: req.organizer_id,
            participant_id: req.participant_id,
            start_time: req.start_time,
            end_time: req.end_time,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Get an appointment by id
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/appointments/:id
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such appointment
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid appointment ID format".to_string()))?;

    let appointment = state.booking.get_appointment(id).await?;

    Ok(Json(appointment))
}
