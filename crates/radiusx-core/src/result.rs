//! Result type aliases for RadiusX.

use crate::RadiusxError;

/// A specialized `Result` type for RadiusX operations.
pub type RadiusxResult<T> = Result<T, RadiusxError>;
