//! Typed ID wrappers for domain entities.

use crate::{RadiusxError, RadiusxResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for store-assigned user IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Creates a user ID from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Converts to the signed representation used by `BIGSERIAL` columns.
    pub fn to_db(self) -> RadiusxResult<i64> {
        i64::try_from(self.0)
            .map_err(|_| RadiusxError::validation(format!("user id {} is out of range", self.0)))
    }

    /// Converts from the signed representation used by `BIGSERIAL` columns.
    pub fn from_db(id: i64) -> RadiusxResult<Self> {
        u64::try_from(id)
            .map(Self)
            .map_err(|_| RadiusxError::database(format!("negative user id {id} in store")))
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
