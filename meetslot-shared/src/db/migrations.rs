/// Database migration runner
///
/// Runs the SQL migrations in the workspace-root `migrations/` directory
/// using sqlx's embedded migration system. Migrations are applied once,
/// in order, and recorded in the `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use meetslot_shared::db::pool::{create_pool, DatabaseConfig};
/// use meetslot_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

use sqlx::postgres::PgPool;
use tracing::info;

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails
/// to execute, or the connection is lost mid-migration. Failed
/// migrations roll back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("Database migrations complete");
    Ok(())
}
