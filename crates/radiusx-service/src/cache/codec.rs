//! Byte encoding for cached snapshots.

use radiusx_core::RadiusxResult;
use serde::{de::DeserializeOwned, Serialize};

/// Encodes a value as JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> RadiusxResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes JSON bytes. Malformed input is a `Serialization` error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> RadiusxResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
