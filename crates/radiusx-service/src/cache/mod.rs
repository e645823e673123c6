//! Cache gateway and its backends.

mod cache_interface;
pub mod cache_keys;
pub mod codec;
mod memory_cache;
mod redis_cache;

pub use cache_interface::*;
pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};
