/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/users` - Create a user
/// - `GET  /api/v1/users/:id` - Get a user by id

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use meetslot_shared::models::user::{NewUser, User};
use serde::Deserialize;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: String,

    /// Email address (must be unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Free-form role label
    #[validate(length(min = 1, max = 100, message = "Role must not be empty"))]
    pub role: String,
}

/// Create a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/users
/// Content-Type: application/json
///
/// {
///   "name": "Alice",
///   "email": "a@x.com",
///   "role": "member"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = state
        .users
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            role: req.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/users/:id
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid user ID format".to_string()))?;

    let user = state.users.get_user(id).await?;

    Ok(Json(user))
}
