//! Repository trait definitions.

use async_trait::async_trait;
use radiusx_core::{Interface, ListParams, NewUser, RadiusxResult, User, UserId, UserUpdate};

/// Store of record for user rows.
///
/// Absent rows are reported as `DataNotFound`, unique violations as
/// `ConflictData`; everything else is `Database`.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a user whose credential is already hashed.
    async fn create_user(&self, user: &NewUser) -> RadiusxResult<User>;

    /// Finds a user by ID.
    async fn get_user_by_id(&self, id: UserId) -> RadiusxResult<User>;

    /// Finds a user by email.
    async fn get_user_by_email(&self, email: &str) -> RadiusxResult<User>;

    /// Lists users ordered by ID.
    async fn list_users(&self, params: ListParams) -> RadiusxResult<Vec<User>>;

    /// Applies a partial update. Unset or empty fields keep their stored
    /// value. Returns the row as stored after the update.
    async fn update_user(&self, update: &UserUpdate) -> RadiusxResult<User>;

    /// Deletes a user by ID.
    async fn delete_user(&self, id: UserId) -> RadiusxResult<()>;
}
