/// User service: creation with email uniqueness, lookup by id
///
/// Creation checks the directory for the email first so the common case
/// reports a clean duplicate without hitting the unique constraint; the
/// race window between check and insert is closed by the constraint
/// itself, which surfaces as the same error kind.

use thiserror::Error;
use tracing::error;

use crate::models::user::{NewUser, User};
use crate::store::{DirectoryError, StoreError, UserDirectory};

/// Error type for user operations
#[derive(Debug, Error)]
pub enum UserError {
    /// Lookup target does not exist
    #[error("user not found")]
    NotFound,

    /// A user with this email already exists
    #[error("email already exists")]
    EmailExists,

    /// The directory failed to persist the new user
    #[error("failed to create user")]
    CreateFailed(#[source] StoreError),

    /// Unexpected persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User service
#[derive(Debug, Clone)]
pub struct UserService<D> {
    directory: D,
}

impl<D> UserService<D>
where
    D: UserDirectory,
{
    /// Creates a user service over the given directory
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Creates a user, enforcing email uniqueness
    ///
    /// # Errors
    ///
    /// - [`UserError::EmailExists`] if the email is already registered
    /// - [`UserError::CreateFailed`] if the insert failed
    /// - [`UserError::Store`] if the uniqueness check itself failed
    pub async fn create_user(&self, data: NewUser) -> Result<User, UserError> {
        if self.directory.find_by_email(&data.email).await?.is_some() {
            return Err(UserError::EmailExists);
        }

        match self.directory.create(data).await {
            Ok(user) => Ok(user),
            Err(DirectoryError::DuplicateEmail) => Err(UserError::EmailExists),
            Err(DirectoryError::Store(err)) => {
                error!(error = %err, "failed to create user");
                Err(UserError::CreateFailed(err))
            }
        }
    }

    /// Fetches a user by identifier
    ///
    /// # Errors
    ///
    /// - [`UserError::NotFound`] if no user has this id
    /// - [`UserError::Store`] if the lookup itself failed
    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        match self.directory.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(UserError::NotFound),
        }
    }
}
