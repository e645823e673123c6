//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use radiusx_core::{RadiusxError, RadiusxResult};
use shaku::Component;
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 100;

/// Redis-based cache service.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Pool,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RadiusxResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| RadiusxError::cache(format!("failed to get Redis connection: {e}")))
    }
}

/// Redis expirations are whole seconds; sub-second TTLs round up to one.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> RadiusxResult<Option<Vec<u8>>> {
        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| RadiusxError::cache(format!("failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> RadiusxResult<()> {
        let mut conn = self.get_conn().await?;

        match ttl {
            Some(ttl) => {
                let secs = expiry_secs(ttl);
                conn.set_ex::<_, _, ()>(key, value, secs).await
                    .map_err(|e| RadiusxError::cache(format!("failed to set key '{key}': {e}")))?;
                debug!("Cached key '{}' with TTL {}s", key, secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value).await
                    .map_err(|e| RadiusxError::cache(format!("failed to set key '{key}': {e}")))?;
                debug!("Cached key '{}' without expiry", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> RadiusxResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| RadiusxError::cache(format!("failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> RadiusxResult<u64> {
        let mut conn = self.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // SCAN may return a key more than once; DEL of a gone key counts zero.
        loop {
            let (next, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| RadiusxError::cache(format!("failed to scan '{pattern}': {e}")))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| RadiusxError::cache(format!("failed to delete keys: {e}")))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }

    async fn close(&self) {
        info!("Closing Redis connection pool...");
        self.pool.close();
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisCacheService")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}
