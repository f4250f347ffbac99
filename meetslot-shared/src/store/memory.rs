/// In-memory adapter for testing and demos
///
/// This adapter implements both storage ports over plain hash maps. It is
/// useful for:
/// - Testing the booking and user services without a database
/// - Demonstrating the transaction protocol
///
/// # Transaction semantics
///
/// `begin` acquires an owned async mutex over the appointment table and
/// holds it for the life of the transaction handle, so a conflict scan and
/// the insert that follows are serializable against every other creation,
/// matching the guarantee the Postgres adapter gets from advisory locks.
/// Inserts are staged on the handle and only applied at commit; dropping
/// the handle discards them.
///
/// # Failure injection
///
/// `fail_next_insert` / `fail_next_commit` arm a one-shot failure for the
/// next matching operation, for exercising the creation protocol's
/// rollback paths.
///
/// # Example
///
/// ```
/// use meetslot_shared::store::memory::MemoryStore;
/// use meetslot_shared::store::UserDirectory;
/// use meetslot_shared::models::user::NewUser;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store
///     .create(NewUser {
///         name: "Alice".to_string(),
///         email: "alice@example.com".to_string(),
///         role: "member".to_string(),
///     })
///     .await?;
/// assert_eq!(user.id, 1);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::appointment::{Appointment, NewAppointment};
use crate::models::user::{NewUser, User};
use crate::store::{AppointmentStore, DirectoryError, StoreError, UserDirectory};

#[derive(Debug, Default)]
struct UserTable {
    rows: HashMap<i64, User>,
    next_id: i64,
}

#[derive(Debug, Default)]
struct AppointmentTable {
    rows: HashMap<i64, Appointment>,
    next_id: i64,
}

/// In-memory store implementing both [`UserDirectory`] and
/// [`AppointmentStore`]
///
/// Cloning is cheap and clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<StdMutex<UserTable>>,
    appointments: Arc<AsyncMutex<AppointmentTable>>,
    fail_next_insert: Arc<AtomicBool>,
    fail_next_commit: Arc<AtomicBool>,
}

/// Transaction handle for [`MemoryStore`]
///
/// Owns the appointment table lock until committed, rolled back, or
/// dropped. Staged inserts are discarded unless committed.
pub struct MemoryTxn {
    table: OwnedMutexGuard<AppointmentTable>,
    staged: Vec<Appointment>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot failure for the next appointment insert
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Arms a one-shot failure for the next commit
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of committed appointments
    pub async fn appointment_count(&self) -> usize {
        self.appointments.lock().await.rows.len()
    }

    /// Number of users in the directory
    pub fn user_count(&self) -> usize {
        self.users
            .lock()
            .map(|table| table.rows.len())
            .unwrap_or(0)
    }

    fn user_table(&self) -> Result<MutexGuard<'_, UserTable>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Backend("user table lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.user_table()?.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .user_table()?
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, data: NewUser) -> Result<User, DirectoryError> {
        let mut table = self.user_table()?;

        if table.rows.values().any(|user| user.email == data.email) {
            return Err(DirectoryError::DuplicateEmail);
        }

        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            name: data.name,
            email: data.email,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    type Txn = MemoryTxn;

    async fn begin(&self) -> Result<Self::Txn, StoreError> {
        Ok(MemoryTxn {
            table: self.appointments.clone().lock_owned().await,
            staged: Vec::new(),
        })
    }

    async fn find_conflicts(
        &self,
        txn: &mut Self::Txn,
        candidate: &NewAppointment,
    ) -> Result<Vec<Appointment>, StoreError> {
        let conflicts = txn
            .table
            .rows
            .values()
            .chain(txn.staged.iter())
            .filter(|existing| {
                existing.status.is_active()
                    && (existing.involves(candidate.organizer_id)
                        || existing.involves(candidate.participant_id))
                    && existing.overlaps(candidate.start_time, candidate.end_time)
            })
            .cloned()
            .collect();

        Ok(conflicts)
    }

    async fn insert(
        &self,
        txn: &mut Self::Txn,
        candidate: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected insert failure".to_string()));
        }

        txn.table.next_id += 1;
        let now = Utc::now();
        let appointment = Appointment {
            id: txn.table.next_id,
            organizer_id: candidate.organizer_id,
            participant_id: candidate.participant_id,
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            description: candidate.description,
            status: candidate.status,
            created_at: now,
            updated_at: now,
        };
        txn.staged.push(appointment.clone());

        Ok(appointment)
    }

    async fn commit(&self, mut txn: Self::Txn) -> Result<(), StoreError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            // Dropping the handle discards staged rows; nothing partial
            // becomes visible.
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }

        for appointment in txn.staged.drain(..) {
            txn.table.rows.insert(appointment.id, appointment);
        }

        Ok(())
    }

    async fn rollback(&self, txn: Self::Txn) -> Result<(), StoreError> {
        drop(txn);
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.lock().await.rows.get(&id).cloned())
    }
}
