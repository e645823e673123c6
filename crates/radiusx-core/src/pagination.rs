//! Pagination types for list operations.

use crate::{RadiusxError, RadiusxResult};

/// Page selector for user listings.
///
/// `skip` is a 1-based page number, so the row offset is
/// `(skip - 1) * limit`. Construction rejects values that would make the
/// offset undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListParams {
    skip: u64,
    limit: u64,
}

impl ListParams {
    /// Creates validated list parameters.
    pub fn new(skip: u64, limit: u64) -> RadiusxResult<Self> {
        if skip == 0 {
            return Err(RadiusxError::validation("skip must be at least 1"));
        }
        if limit == 0 {
            return Err(RadiusxError::validation("limit must be at least 1"));
        }
        let offset = (skip - 1)
            .checked_mul(limit)
            .ok_or_else(|| RadiusxError::validation("page offset overflows"))?;
        if i64::try_from(offset).is_err() || i64::try_from(limit).is_err() {
            return Err(RadiusxError::validation("page offset overflows"));
        }
        Ok(Self { skip, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// The page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the row offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.skip - 1) * self.limit
    }
}
