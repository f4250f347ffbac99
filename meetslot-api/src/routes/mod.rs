/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User creation and lookup
/// - `appointments`: Appointment creation and lookup

pub mod appointments;
pub mod health;
pub mod users;
