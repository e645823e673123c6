//! Dependency injection module using Shaku.
//!
//! Two modules share every component except the cache backend:
//! - `RedisUsersModule`: Redis-backed cache (`redis.enabled = true`)
//! - `InMemoryUsersModule`: process-local cache (`redis.enabled = false`)

use radiusx_config::{AppConfig, RedisConfig};
use radiusx_core::{RadiusxError, RadiusxResult};
use radiusx_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PgUserRepository};
use radiusx_security::{PasswordHasher, PasswordHasherParameters};
use radiusx_service::{
    CacheInterface, InMemoryCache, RedisCacheService, RedisCacheServiceParameters, UserService, UserServiceImpl,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

module! {
    pub RedisUsersModule {
        components = [
            DatabasePool,
            PasswordHasher,
            PgUserRepository,
            RedisCacheService,
            UserServiceImpl,
        ],
        providers = [],
    }
}

module! {
    pub InMemoryUsersModule {
        components = [
            DatabasePool,
            PasswordHasher,
            PgUserRepository,
            InMemoryCache,
            UserServiceImpl,
        ],
        providers = [],
    }
}

/// Handles the binary needs after wiring.
#[derive(Clone)]
pub struct AppServices {
    pub user_service: Arc<dyn UserService>,
    pub cache: Arc<dyn CacheInterface>,
    pub database: Arc<dyn DatabasePoolInterface>,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("cache", &self.cache.backend())
            .finish_non_exhaustive()
    }
}

fn resolve<M>(module: &M) -> AppServices
where
    M: HasComponent<dyn UserService> + HasComponent<dyn CacheInterface> + HasComponent<dyn DatabasePoolInterface>,
{
    AppServices {
        user_service: module.resolve(),
        cache: module.resolve(),
        database: module.resolve(),
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Creates the Redis connection pool. Connections are opened lazily.
pub fn create_redis_pool(config: &RedisConfig) -> RadiusxResult<deadpool_redis::Pool> {
    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));

    redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| RadiusxError::Configuration(format!("failed to create Redis pool: {e}")))
}

/// Wires every component from `config` around an established database pool.
pub fn build_services(config: &AppConfig, database: &DatabasePool) -> RadiusxResult<AppServices> {
    let password_hasher = PasswordHasher::with_cost(config.security.password_hash_cost);
    let pool = database.inner().clone();

    if config.redis.enabled {
        info!("Using Redis cache at {}", config.redis.url);
        let module = RedisUsersModule::builder()
            .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool })
            .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
                argon2: password_hasher.argon2_arc(),
            })
            .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
                pool: create_redis_pool(&config.redis)?,
            })
            .build();
        Ok(resolve(&module))
    } else {
        info!("Redis disabled, using in-memory cache");
        let module = InMemoryUsersModule::builder()
            .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool })
            .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
                argon2: password_hasher.argon2_arc(),
            })
            .build();
        Ok(resolve(&module))
    }
}
