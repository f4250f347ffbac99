//! # MeetSlot Shared Library
//!
//! This crate contains the models, storage contracts, and business logic
//! shared by the MeetSlot API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Storage contracts (ports) plus Postgres and in-memory adapters
//! - `service`: Booking and user services (the core protocols)
//! - `db`: Connection pool and migration utilities

pub mod db;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the MeetSlot shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
