//! User service trait definition.

use async_trait::async_trait;
use radiusx_core::{Interface, ListParams, NewUser, RadiusxResult, RequestContext, User, UserId, UserUpdate};

/// User orchestration service.
///
/// Every operation honors `ctx`: once it is cancelled or past its deadline no
/// further collaborator calls are made. Callers only ever see
/// `DataNotFound`, `ConflictData`, `NoUpdatedData` or `Internal`.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Hashes the credential, persists the user and caches the snapshot.
    async fn register(&self, ctx: &RequestContext, user: NewUser) -> RadiusxResult<User>;

    /// Gets a user by ID, cache first.
    async fn get_user(&self, ctx: &RequestContext, id: UserId) -> RadiusxResult<User>;

    /// Lists a page of users, cache first.
    async fn list_users(&self, ctx: &RequestContext, params: ListParams) -> RadiusxResult<Vec<User>>;

    /// Applies a partial update and refreshes the cached snapshot.
    async fn update_user(&self, ctx: &RequestContext, update: UserUpdate) -> RadiusxResult<User>;

    /// Deletes a user and evicts everything cached about it.
    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> RadiusxResult<()>;
}
