/// Postgres adapters for the storage ports
///
/// This module provides the production implementations of
/// [`UserDirectory`] and [`AppointmentStore`] backed by sqlx.
///
/// # Transactions and double-booking
///
/// The appointment store hands out `sqlx::Transaction` handles. The
/// conflict scan takes `pg_advisory_xact_lock` on both participant ids
/// (ascending order, so two requests sharing both users cannot deadlock)
/// before scanning. Any two creations sharing a user therefore serialize
/// on that user's lock: the later scan runs after the earlier transaction
/// resolved and sees its row. This closes the write-skew window that a
/// plain scan-then-insert under READ COMMITTED would leave open.
///
/// Dropping a transaction handle without committing rolls it back, which
/// is what makes mid-flight cancellation safe.
///
/// # Example
///
/// ```no_run
/// use meetslot_shared::db::pool::{create_pool, DatabaseConfig};
/// use meetslot_shared::store::postgres::{PgAppointmentStore, PgUserDirectory};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let directory = PgUserDirectory::new(pool.clone());
/// let store = PgAppointmentStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::appointment::{Appointment, NewAppointment};
use crate::models::user::{NewUser, User};
use crate::store::{AppointmentStore, DirectoryError, StoreError, UserDirectory};

/// User directory backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Creates a directory over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, data: NewUser) -> Result<User, DirectoryError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, role, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint().is_some_and(|c| c.contains("email")) =>
            {
                Err(DirectoryError::DuplicateEmail)
            }
            Err(err) => Err(StoreError::from(err).into()),
        }
    }
}

/// Appointment store backed by the `appointments` table
#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    /// Creates a store over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    type Txn = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Txn, StoreError> {
        Ok(self.pool.begin().await?)
    }

    async fn find_conflicts(
        &self,
        txn: &mut Self::Txn,
        candidate: &NewAppointment,
    ) -> Result<Vec<Appointment>, StoreError> {
        // Serialize against concurrent creations touching either user.
        // Locks are taken in ascending id order; released at commit/rollback.
        let (lo, hi) = if candidate.organizer_id <= candidate.participant_id {
            (candidate.organizer_id, candidate.participant_id)
        } else {
            (candidate.participant_id, candidate.organizer_id)
        };

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(lo)
            .execute(&mut **txn)
            .await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(hi)
            .execute(&mut **txn)
            .await?;

        let conflicts = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, organizer_id, participant_id, start_time, end_time,
                   description, status, created_at, updated_at
            FROM appointments
            WHERE start_time < $1
              AND end_time > $2
              AND (organizer_id IN ($3, $4) OR participant_id IN ($3, $4))
              AND status NOT IN ('cancelled', 'completed')
            "#,
        )
        .bind(candidate.end_time)
        .bind(candidate.start_time)
        .bind(candidate.organizer_id)
        .bind(candidate.participant_id)
        .fetch_all(&mut **txn)
        .await?;

        Ok(conflicts)
    }

    async fn insert(
        &self,
        txn: &mut Self::Txn,
        candidate: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments
                (organizer_id, participant_id, start_time, end_time, description, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organizer_id, participant_id, start_time, end_time,
                      description, status, created_at, updated_at
            "#,
        )
        .bind(candidate.organizer_id)
        .bind(candidate.participant_id)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .bind(candidate.description)
        .bind(candidate.status)
        .fetch_one(&mut **txn)
        .await?;

        Ok(appointment)
    }

    async fn commit(&self, txn: Self::Txn) -> Result<(), StoreError> {
        Ok(txn.commit().await?)
    }

    async fn rollback(&self, txn: Self::Txn) -> Result<(), StoreError> {
        Ok(txn.rollback().await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, organizer_id, participant_id, start_time, end_time,
                   description, status, created_at, updated_at
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }
}
