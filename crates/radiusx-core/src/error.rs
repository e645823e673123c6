//! Error taxonomy shared by every layer of the users service.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for RadiusX.
///
/// Only the first group of variants ever leaves the orchestration service.
/// Collaborator variants are produced by gateways and normalized to
/// [`RadiusxError::Internal`] before reaching a caller.
#[derive(Error, Debug)]
pub enum RadiusxError {
    // ============ Service Errors ============
    /// Entity absent in the store of record
    #[error("data not found: {resource_type} with id {id}")]
    DataNotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Uniqueness violation on write
    #[error("data conflicts with existing data: {0}")]
    ConflictData(String),

    /// Update request is a no-op
    #[error("no data to update")]
    NoUpdatedData,

    /// Any failure the caller cannot act on
    #[error("internal server error")]
    Internal,

    // ============ Transport Errors ============
    /// Request failed field validation
    #[error("validation error: {0}")]
    Validation(String),

    // ============ Collaborator Errors ============
    /// Store-of-record failure
    #[error("database error: {0}")]
    Database(String),

    /// Cache gateway failure
    #[error("cache error: {0}")]
    Cache(String),

    /// Snapshot could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Credential transform failure
    #[error("credential error: {0}")]
    Credential(String),

    /// Caller context cancelled or its deadline elapsed
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RadiusxError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DataNotFound { .. } => "DATA_NOT_FOUND",
            Self::ConflictData(_) => "CONFLICT_DATA",
            Self::NoUpdatedData => "NO_UPDATED_DATA",
            Self::Internal => "INTERNAL",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Credential(_) => "CREDENTIAL_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::DataNotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::ConflictData(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a database error.
    #[must_use]
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database(message.into())
    }

    /// True for the kinds a store failure may carry through to a caller.
    #[must_use]
    pub const fn is_caller_actionable(&self) -> bool {
        matches!(self, Self::DataNotFound { .. } | Self::ConflictData(_))
    }

    /// True for errors that are allowed to cross the service boundary.
    #[must_use]
    pub const fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::DataNotFound { .. }
                | Self::ConflictData(_)
                | Self::NoUpdatedData
                | Self::Internal
                | Self::Validation(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RadiusxError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::DataNotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique_violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::ConflictData(db_err.constraint().map_or_else(
                        || "unique constraint violated".to_string(),
                        |constraint| format!("unique constraint {constraint} violated"),
                    ));
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RadiusxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
