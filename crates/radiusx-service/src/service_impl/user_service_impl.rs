//! Cache-aside user service.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::user_service::UserService;
use async_trait::async_trait;
use radiusx_core::{ListParams, NewUser, RadiusxError, RadiusxResult, RequestContext, User, UserId, UserUpdate};
use radiusx_repository::UserRepository;
use radiusx_security::PasswordHasherInterface;
use serde::de::DeserializeOwned;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Cache-aside user service.
///
/// Snapshots are cached without expiry under `user:<id>` and
/// `users:<skip>:<limit>`. Every successful write sweeps all list pages.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,

    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,

    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
        }
    }

    /// Reads a snapshot. Transport failures degrade to a miss; a corrupt
    /// entry does not.
    async fn cached<T: DeserializeOwned + Send>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        key: &str,
    ) -> RadiusxResult<Option<T>> {
        match ctx.run(self.cache.get::<T>(key)).await {
            Ok(hit) => Ok(hit),
            Err(err @ (RadiusxError::Serialization(_) | RadiusxError::Cancelled)) => {
                Err(internal(operation, err))
            }
            Err(err) => {
                warn!(operation, key, error = %err, "Cache read failed, falling back to store");
                Ok(None)
            }
        }
    }

    async fn cache_user(&self, ctx: &RequestContext, operation: &'static str, user: &User) -> RadiusxResult<()> {
        ctx.run(self.cache.set(&cache_keys::user_key(user.id), user, None))
            .await
            .map_err(|e| internal(operation, e))
    }

    async fn sweep_lists(&self, ctx: &RequestContext, operation: &'static str) -> RadiusxResult<()> {
        let swept = ctx
            .run(self.cache.delete_pattern(cache_keys::USERS_SWEEP_PATTERN))
            .await
            .map_err(|e| internal(operation, e))?;
        debug!(operation, swept, "Swept cached user lists");
        Ok(())
    }

    fn hash(&self, operation: &'static str, password: &str) -> RadiusxResult<String> {
        self.password_hasher
            .hash(password)
            .map_err(|e| internal(operation, e))
    }
}

/// Logs `err` and replaces it with `Internal`.
fn internal(operation: &'static str, err: RadiusxError) -> RadiusxError {
    error!(operation, error = %err, code = err.error_code(), "User operation failed");
    RadiusxError::Internal
}

/// Passes `DataNotFound` and `ConflictData` through, normalizes the rest.
fn classify(operation: &'static str, err: RadiusxError) -> RadiusxError {
    if err.is_caller_actionable() {
        err
    } else {
        internal(operation, err)
    }
}

/// Passes `ConflictData` through, normalizes the rest.
fn conflict_or_internal(operation: &'static str, err: RadiusxError) -> RadiusxError {
    match err {
        RadiusxError::ConflictData(_) => err,
        other => internal(operation, other),
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn register(&self, ctx: &RequestContext, user: NewUser) -> RadiusxResult<User> {
        const OP: &str = "register";
        debug!("Registering user: {}", user.email);
        ctx.check().map_err(|e| internal(OP, e))?;

        let hashed = self.hash(OP, &user.password)?;
        let created = ctx
            .run(self.user_repository.create_user(&user.with_password(hashed)))
            .await
            .map_err(|e| conflict_or_internal(OP, e))?;

        self.cache_user(ctx, OP, &created).await?;
        self.sweep_lists(ctx, OP).await?;

        info!("User registered: {}", created.id);
        Ok(created)
    }

    async fn get_user(&self, ctx: &RequestContext, id: UserId) -> RadiusxResult<User> {
        const OP: &str = "get_user";
        debug!("Getting user: {}", id);
        ctx.check().map_err(|e| internal(OP, e))?;

        let key = cache_keys::user_key(id);
        if let Some(user) = self.cached::<User>(ctx, OP, &key).await? {
            return Ok(user);
        }

        let user = ctx
            .run(self.user_repository.get_user_by_id(id))
            .await
            .map_err(|e| classify(OP, e))?;
        self.cache_user(ctx, OP, &user).await?;

        Ok(user)
    }

    async fn list_users(&self, ctx: &RequestContext, params: ListParams) -> RadiusxResult<Vec<User>> {
        const OP: &str = "list_users";
        debug!(skip = params.skip(), limit = params.limit(), "Listing users");
        ctx.check().map_err(|e| internal(OP, e))?;

        let key = cache_keys::users_key(params.skip(), params.limit());
        if let Some(users) = self.cached::<Vec<User>>(ctx, OP, &key).await? {
            return Ok(users);
        }

        let users = ctx
            .run(self.user_repository.list_users(params))
            .await
            .map_err(|e| internal(OP, e))?;
        ctx.run(self.cache.set(&key, &users, None))
            .await
            .map_err(|e| internal(OP, e))?;

        Ok(users)
    }

    async fn update_user(&self, ctx: &RequestContext, mut update: UserUpdate) -> RadiusxResult<User> {
        const OP: &str = "update_user";
        debug!("Updating user: {}", update.id);
        ctx.check().map_err(|e| internal(OP, e))?;

        let existing = ctx
            .run(self.user_repository.get_user_by_id(update.id))
            .await
            .map_err(|e| classify(OP, e))?;

        if update.is_blank() || update.matches_profile(&existing) {
            debug!("Nothing to update for user: {}", update.id);
            return Err(RadiusxError::NoUpdatedData);
        }

        let hashed = update
            .password()
            .map(|password| self.hash(OP, password))
            .transpose()?;
        update.password = hashed;

        let updated = ctx
            .run(self.user_repository.update_user(&update))
            .await
            .map_err(|e| conflict_or_internal(OP, e))?;

        ctx.run(self.cache.delete(&cache_keys::user_key(updated.id)))
            .await
            .map_err(|e| internal(OP, e))?;
        self.cache_user(ctx, OP, &updated).await?;
        self.sweep_lists(ctx, OP).await?;

        info!("User updated: {}", updated.id);
        Ok(updated)
    }

    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> RadiusxResult<()> {
        const OP: &str = "delete_user";
        debug!("Deleting user: {}", id);
        ctx.check().map_err(|e| internal(OP, e))?;

        ctx.run(self.user_repository.get_user_by_id(id))
            .await
            .map_err(|e| classify(OP, e))?;

        ctx.run(self.cache.delete(&cache_keys::user_key(id)))
            .await
            .map_err(|e| internal(OP, e))?;
        self.sweep_lists(ctx, OP).await?;
        ctx.run(self.user_repository.delete_user(id))
            .await
            .map_err(|e| internal(OP, e))?;

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("cache", &self.cache.backend())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{codec, InMemoryCache, MockCacheInterface};
    use chrono::{TimeZone, Utc};
    use mockall::{predicate::eq, Sequence};
    use radiusx_core::Role;
    use radiusx_repository::MockUserRepository;
    use radiusx_security::MockPasswordHasherInterface;

    fn user(id: u64, name: &str, email: &str) -> User {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            password: "$argon2id$stored".to_string(),
            role: Role::Reader,
            created_at: at,
            updated_at: at,
        }
    }

    fn ana() -> User {
        user(1, "Ana", "a@x.com")
    }

    fn hasher() -> MockPasswordHasherInterface {
        let mut hasher = MockPasswordHasherInterface::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(format!("hashed:{password}")));
        hasher
    }

    fn service(
        repo: MockUserRepository,
        hasher: MockPasswordHasherInterface,
        cache: impl CacheInterface + 'static,
    ) -> UserServiceImpl {
        UserServiceImpl::new(Arc::new(repo), Arc::new(hasher), Arc::new(cache))
    }

    fn cache_miss(cache: &mut MockCacheInterface) {
        cache.expect_get_raw().returning(|_| Ok(None));
    }

    fn cache_accepts_writes(cache: &mut MockCacheInterface) {
        cache.expect_set_raw().returning(|_, _, _| Ok(()));
        cache.expect_delete().returning(|_| Ok(true));
        cache.expect_delete_pattern().returning(|_| Ok(0));
    }

    fn cache_failure() -> RadiusxError {
        RadiusxError::cache("connection reset")
    }

    // ---- register ----

    #[tokio::test]
    async fn test_register_hashes_persists_and_caches() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .withf(|u| u.password == "hashed:pw" && u.email == "a@x.com")
            .times(1)
            .returning(|u| Ok(user(1, &u.name, &u.email)));

        let cache = InMemoryCache::new();
        cache.set_raw("users:1:10", b"[]", None).await.unwrap();
        let cache = Arc::new(cache);
        let service = UserServiceImpl::new(Arc::new(repo), Arc::new(hasher()), cache.clone());

        let created = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await
            .unwrap();

        assert_eq!(created.id, UserId::new(1));
        assert!(cache.contains("user:1"));
        assert!(!cache.contains("users:1:10"));
    }

    #[tokio::test]
    async fn test_register_conflict_leaves_cache_alone() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|_| Err(RadiusxError::conflict("email taken")));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let result = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await;

        assert!(matches!(result, Err(RadiusxError::ConflictData(_))));
    }

    #[tokio::test]
    async fn test_register_store_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user()
            .returning(|_| Err(RadiusxError::database("connection refused")));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let result = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_register_hash_failure_skips_store() {
        let mut failing = MockPasswordHasherInterface::new();
        failing
            .expect_hash()
            .returning(|_| Err(RadiusxError::Credential("rng unavailable".to_string())));

        let service = service(MockUserRepository::new(), failing, MockCacheInterface::new());
        let result = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_register_cache_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().times(1).returning(|_| Ok(ana()));

        let mut cache = MockCacheInterface::new();
        cache.expect_set_raw().returning(|_, _, _| Err(cache_failure()));

        let service = service(repo, hasher(), cache);
        let result = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_register_sweep_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().returning(|_| Ok(ana()));

        let mut cache = MockCacheInterface::new();
        cache.expect_set_raw().returning(|_, _, _| Ok(()));
        cache
            .expect_delete_pattern()
            .withf(|key| key == "users:*")
            .returning(|_| Err(cache_failure()));

        let service = service(repo, hasher(), cache);
        let result = service
            .register(&RequestContext::new(), NewUser::new("Ana", "a@x.com", "pw"))
            .await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    // ---- get ----

    #[tokio::test]
    async fn test_get_hit_skips_store() {
        let mut cache = MockCacheInterface::new();
        cache
            .expect_get_raw()
            .withf(|key| key == "user:1")
            .returning(|_| Ok(Some(codec::encode(&ana()).unwrap())));

        let service = service(MockUserRepository::new(), hasher(), cache);
        let found = service.get_user(&RequestContext::new(), UserId::new(1)).await.unwrap();

        assert_eq!(found, ana());
    }

    #[tokio::test]
    async fn test_get_miss_populates_cache() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .with(eq(UserId::new(1)))
            .times(1)
            .returning(|_| Ok(ana()));

        let cache = Arc::new(InMemoryCache::new());
        let service = UserServiceImpl::new(Arc::new(repo), Arc::new(hasher()), cache.clone());
        let ctx = RequestContext::new();

        let first = service.get_user(&ctx, UserId::new(1)).await.unwrap();
        let second = service.get_user(&ctx, UserId::new(1)).await.unwrap();

        assert_eq!(first, second);
        assert!(cache.contains("user:1"));
    }

    #[tokio::test]
    async fn test_get_corrupt_entry_is_internal_without_store_read() {
        let mut cache = MockCacheInterface::new();
        cache
            .expect_get_raw()
            .returning(|_| Ok(Some(b"not-a-user".to_vec())));

        let service = service(MockUserRepository::new(), hasher(), cache);
        let result = service.get_user(&RequestContext::new(), UserId::new(1)).await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_get_cache_outage_falls_back_to_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().times(1).returning(|_| Ok(ana()));

        let mut cache = MockCacheInterface::new();
        cache.expect_get_raw().returning(|_| Err(cache_failure()));
        cache.expect_set_raw().returning(|_, _, _| Ok(()));

        let service = service(repo, hasher(), cache);
        let found = service.get_user(&RequestContext::new(), UserId::new(1)).await.unwrap();

        assert_eq!(found.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_get_not_found_does_not_populate() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Err(RadiusxError::not_found("user", id)));

        let mut cache = MockCacheInterface::new();
        cache_miss(&mut cache);

        let service = service(repo, hasher(), cache);
        let result = service.get_user(&RequestContext::new(), UserId::new(404)).await;

        assert!(matches!(result, Err(RadiusxError::DataNotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_store_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .returning(|_| Err(RadiusxError::database("timeout")));

        let mut cache = MockCacheInterface::new();
        cache_miss(&mut cache);

        let service = service(repo, hasher(), cache);
        let result = service.get_user(&RequestContext::new(), UserId::new(1)).await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_get_populate_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));

        let mut cache = MockCacheInterface::new();
        cache_miss(&mut cache);
        cache.expect_set_raw().returning(|_, _, _| Err(cache_failure()));

        let service = service(repo, hasher(), cache);
        let result = service.get_user(&RequestContext::new(), UserId::new(1)).await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    // ---- list ----

    #[tokio::test]
    async fn test_list_miss_populates_page_key() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_users()
            .withf(|params| params.skip() == 2 && params.limit() == 10)
            .times(1)
            .returning(|_| Ok(vec![user(11, "Bo", "b@x.com")]));

        let mut cache = MockCacheInterface::new();
        cache
            .expect_get_raw()
            .withf(|key| key == "users:2:10")
            .returning(|_| Ok(None));
        cache
            .expect_set_raw()
            .withf(|key, _, ttl| key == "users:2:10" && ttl.is_none())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(repo, hasher(), cache);
        let page = service
            .list_users(&RequestContext::new(), ListParams::new(2, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_list_hit_skips_store() {
        let page = vec![ana(), user(2, "Bo", "b@x.com")];
        let encoded = codec::encode(&page).unwrap();

        let mut cache = MockCacheInterface::new();
        cache
            .expect_get_raw()
            .returning(move |_| Ok(Some(encoded.clone())));

        let service = service(MockUserRepository::new(), hasher(), cache);
        let listed = service
            .list_users(&RequestContext::new(), ListParams::new(1, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(listed, page);
    }

    #[tokio::test]
    async fn test_list_store_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_users()
            .returning(|_| Err(RadiusxError::database("relation does not exist")));

        let mut cache = MockCacheInterface::new();
        cache_miss(&mut cache);

        let service = service(repo, hasher(), cache);
        let result = service
            .list_users(&RequestContext::new(), ListParams::new(1, 10).unwrap())
            .await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    // ---- update ----

    #[tokio::test]
    async fn test_update_blank_is_rejected_without_writes() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let result = service
            .update_user(&RequestContext::new(), UserUpdate::new(UserId::new(1)).with_name(""))
            .await;

        assert!(matches!(result, Err(RadiusxError::NoUpdatedData)));
    }

    #[tokio::test]
    async fn test_update_same_profile_ignores_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));

        let service = service(repo, MockPasswordHasherInterface::new(), MockCacheInterface::new());
        let update = UserUpdate::new(UserId::new(1))
            .with_name("Ana")
            .with_email("a@x.com")
            .with_password("new-secret");

        let result = service.update_user(&RequestContext::new(), update).await;
        assert!(matches!(result, Err(RadiusxError::NoUpdatedData)));
    }

    #[tokio::test]
    async fn test_update_refreshes_snapshot_and_sweeps_once() {
        let mut seq = Sequence::new();
        let mut repo = MockUserRepository::new();
        let mut cache = MockCacheInterface::new();

        repo.expect_get_user_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ana()));
        repo.expect_update_user()
            .withf(|u| u.name.as_deref() == Some("Ana B") && u.password.as_deref() == Some("hashed:s3cret!"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(user(1, "Ana B", "a@x.com")));
        cache
            .expect_delete()
            .withf(|key| key == "user:1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        cache
            .expect_set_raw()
            .withf(|key, value, _| {
                key == "user:1" && codec::decode::<User>(value).is_ok_and(|u| u.name == "Ana B")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        cache
            .expect_delete_pattern()
            .withf(|key| key == "users:*")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));

        let service = service(repo, hasher(), cache);
        let update = UserUpdate::new(UserId::new(1))
            .with_name("Ana B")
            .with_password("s3cret!");

        let updated = service.update_user(&RequestContext::new(), update).await.unwrap();
        assert_eq!(updated.name, "Ana B");
    }

    #[tokio::test]
    async fn test_update_email_conflict_passes_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));
        repo.expect_update_user()
            .returning(|_| Err(RadiusxError::conflict("email taken")));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let update = UserUpdate::new(UserId::new(1)).with_email("b@x.com");

        let result = service.update_user(&RequestContext::new(), update).await;
        assert!(matches!(result, Err(RadiusxError::ConflictData(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Err(RadiusxError::not_found("user", id)));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let update = UserUpdate::new(UserId::new(9)).with_name("Zed");

        let result = service.update_user(&RequestContext::new(), update).await;
        assert!(matches!(result, Err(RadiusxError::DataNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_eviction_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));
        repo.expect_update_user()
            .returning(|_| Ok(user(1, "Ana B", "a@x.com")));

        let mut cache = MockCacheInterface::new();
        cache.expect_delete().returning(|_| Err(cache_failure()));

        let service = service(repo, hasher(), cache);
        let update = UserUpdate::new(UserId::new(1)).with_name("Ana B");

        let result = service.update_user(&RequestContext::new(), update).await;
        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    #[tokio::test]
    async fn test_update_role_only_skips_hasher() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));
        repo.expect_update_user()
            .withf(|u| u.password.is_none() && u.role == Some(Role::Admin))
            .returning(|_| {
                let mut promoted = user(1, "Ana", "b@x.com");
                promoted.role = Role::Admin;
                Ok(promoted)
            });

        let mut cache = MockCacheInterface::new();
        cache_accepts_writes(&mut cache);

        let service = service(repo, MockPasswordHasherInterface::new(), cache);
        let update = UserUpdate::new(UserId::new(1))
            .with_email("b@x.com")
            .with_role(Role::Admin);

        let updated = service.update_user(&RequestContext::new(), update).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    // ---- delete ----

    #[tokio::test]
    async fn test_delete_missing_user_touches_nothing() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Err(RadiusxError::not_found("user", id)));

        let service = service(repo, hasher(), MockCacheInterface::new());
        let result = service.delete_user(&RequestContext::new(), UserId::new(404)).await;

        assert!(matches!(result, Err(RadiusxError::DataNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_evicts_sweeps_then_removes_row() {
        let mut seq = Sequence::new();
        let mut repo = MockUserRepository::new();
        let mut cache = MockCacheInterface::new();

        repo.expect_get_user_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ana()));
        cache
            .expect_delete()
            .withf(|key| key == "user:1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        cache
            .expect_delete_pattern()
            .withf(|key| key == "users:*")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(1));
        repo.expect_delete_user()
            .with(eq(UserId::new(1)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let service = service(repo, hasher(), cache);
        service.delete_user(&RequestContext::new(), UserId::new(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_store_failure_after_eviction_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(ana()));
        repo.expect_delete_user()
            .returning(|_| Err(RadiusxError::database("deadlock detected")));

        let mut cache = MockCacheInterface::new();
        cache_accepts_writes(&mut cache);

        let service = service(repo, hasher(), cache);
        let result = service.delete_user(&RequestContext::new(), UserId::new(1)).await;

        assert!(matches!(result, Err(RadiusxError::Internal)));
    }

    // ---- cancellation ----

    #[tokio::test]
    async fn test_cancelled_context_makes_no_calls() {
        let service = service(
            MockUserRepository::new(),
            MockPasswordHasherInterface::new(),
            MockCacheInterface::new(),
        );
        let ctx = RequestContext::new();
        ctx.cancel();

        let register = service.register(&ctx, NewUser::new("Ana", "a@x.com", "pw")).await;
        let get = service.get_user(&ctx, UserId::new(1)).await;
        let list = service.list_users(&ctx, ListParams::new(1, 10).unwrap()).await;
        let update = service
            .update_user(&ctx, UserUpdate::new(UserId::new(1)).with_name("B"))
            .await;
        let delete = service.delete_user(&ctx, UserId::new(1)).await;

        assert!(matches!(register, Err(RadiusxError::Internal)));
        assert!(matches!(get, Err(RadiusxError::Internal)));
        assert!(matches!(list, Err(RadiusxError::Internal)));
        assert!(matches!(update, Err(RadiusxError::Internal)));
        assert!(matches!(delete, Err(RadiusxError::Internal)));
    }

    #[test]
    fn test_debug_names_backend() {
        let service = service(MockUserRepository::new(), hasher(), InMemoryCache::new());
        assert!(format!("{service:?}").contains("in-memory"));
    }
}
