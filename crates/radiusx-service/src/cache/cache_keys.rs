//! Cache key generation utilities.

use radiusx_core::UserId;

/// Pattern matching every cached list page.
pub const USERS_SWEEP_PATTERN: &str = "users:*";

/// Key for a single user snapshot.
#[must_use]
pub fn user_key(id: UserId) -> String {
    format!("user:{id}")
}

/// Key for a list page.
#[must_use]
pub fn users_key(skip: u64, limit: u64) -> String {
    format!("users:{skip}:{limit}")
}
