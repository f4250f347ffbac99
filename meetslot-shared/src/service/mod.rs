/// Business services for MeetSlot
///
/// This module contains the service layer driven by the transport adapter:
///
/// - `booking`: appointment creation with conflict detection (the core
///   protocol) and appointment lookup
/// - `users`: user creation with email-uniqueness checks and user lookup
///
/// Services receive their storage dependencies by construction and are
/// generic over the port traits in [`crate::store`], so they run unchanged
/// against Postgres or the in-memory adapter.

pub mod booking;
pub mod users;
