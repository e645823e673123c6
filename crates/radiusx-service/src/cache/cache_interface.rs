//! Cache interface trait for abstracted caching operations.

use super::codec;
use async_trait::async_trait;
use radiusx_core::RadiusxResult;
use shaku::Interface;
use std::time::Duration;

/// Key-value cache gateway.
///
/// Values are opaque bytes so the trait stays dyn-compatible; [`CacheExt`]
/// layers typed access on top. Implementations report transport failures as
/// `Cache` errors and must never report an absent key as an error.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw value. `None` means the key is absent or expired.
    async fn get_raw(&self, key: &str) -> RadiusxResult<Option<Vec<u8>>>;

    /// Set a raw value. `ttl: None` stores it without expiration.
    async fn set_raw(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> RadiusxResult<()>;

    /// Delete a value. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> RadiusxResult<bool>;

    /// Delete every key matching a glob pattern such as `users:*`.
    ///
    /// Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> RadiusxResult<u64>;

    /// Release the underlying connections and drop held entries.
    async fn close(&self);

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Typed access over [`CacheInterface`].
///
/// A decode failure surfaces as `Serialization`, distinct from a `Cache`
/// transport error, so callers can tell corruption from unavailability.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get and decode a value.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> RadiusxResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and set a value.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> RadiusxResult<()> {
        let bytes = codec::encode(value)?;
        self.set_raw(key, &bytes, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
