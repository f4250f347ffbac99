/// Database models for MeetSlot
///
/// This module contains the persistent data structures of the booking
/// service.
///
/// # Models
///
/// - `user`: User identity records (name, email, role)
/// - `appointment`: Appointments between two users with a time window
///
/// # Example
///
/// ```no_run
/// use meetslot_shared::models::user::{NewUser, User};
/// use meetslot_shared::store::postgres::PgUserDirectory;
/// use meetslot_shared::store::UserDirectory;
/// use meetslot_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let directory = PgUserDirectory::new(pool);
///
/// let user = directory
///     .create(NewUser {
///         name: "Alice".to_string(),
///         email: "alice@example.com".to_string(),
///         role: "member".to_string(),
///     })
///     .await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

pub mod appointment;
pub mod user;
