/// User model
///
/// This module provides the User record stored by the user directory.
/// Users are referenced by appointments as organizer and participant.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     role VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Users are created once through the directory and are read-only
/// afterwards. No two users share an email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record
///
/// The identifier is assigned by storage on creation and is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, assigned on creation
    pub id: i64,

    /// Display name (non-empty)
    pub name: String,

    /// Email address, unique across all users
    ///
    /// Stored case-sensitively; uniqueness is byte-wise
    pub email: String,

    /// Free-form role label (e.g. "member", "provider")
    pub role: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// All fields are required and must be non-empty; the transport layer
/// validates them before they reach the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,

    /// Email address (must not already exist in the directory)
    pub email: String,

    /// Role label
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_fields() {
        let new_user = NewUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "member".to_string(),
        };

        assert_eq!(new_user.name, "Alice");
        assert_eq!(new_user.email, "alice@example.com");
        assert_eq!(new_user.role, "member");
    }
}
