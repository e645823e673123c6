//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use radiusx_core::{Interface, RadiusxError, RadiusxResult};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Interface for password hashing operations.
///
/// Implementations must be one-way and salted: hashing the same input twice
/// yields different outputs, neither equal to the input.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into its stored form.
    fn hash(&self, password: &str) -> RadiusxResult<String>;

    /// Verifies a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> RadiusxResult<bool>;
}

/// Password hasher service using Argon2id.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    ///
    /// Falls back to the library defaults if the cost is out of range.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = cost
            .checked_mul(1024)
            .and_then(|memory_kib| Params::new(memory_kib, 3, 1, None).ok())
            .unwrap_or(Params::DEFAULT);

        Self::with_params(params)
    }

    /// Returns the internal Argon2 instance for shaku parameter wiring.
    #[must_use]
    pub fn argon2_arc(&self) -> Arc<Argon2<'static>> {
        Arc::clone(&self.argon2)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> RadiusxResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| RadiusxError::Credential(format!("failed to hash password: {e}")))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> RadiusxResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| RadiusxError::Credential(format!("invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(RadiusxError::Credential(format!("password verification error: {e}"))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw").unwrap();

        assert_ne!(hash, "pw");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("SamePassword").unwrap();
        let hash2 = hasher.hash("SamePassword").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("SamePassword", &hash1).unwrap());
        assert!(hasher.verify("SamePassword", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_is_credential_error() {
        let result = fast_hasher().verify("password", "not-a-valid-hash");
        assert!(matches!(result, Err(RadiusxError::Credential(_))));
    }

    #[test]
    fn test_out_of_range_cost_falls_back() {
        let hasher = PasswordHasher::with_cost(u32::MAX);
        let hash = hasher.hash("pw").unwrap();
        assert!(hasher.verify("pw", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_still_hashes() {
        let hasher = fast_hasher();
        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_mock_hasher_failure() {
        let mut mock = MockPasswordHasherInterface::new();
        mock.expect_hash()
            .returning(|_| Err(RadiusxError::Credential("rng unavailable".to_string())));

        assert!(matches!(mock.hash("pw"), Err(RadiusxError::Credential(_))));
    }

    #[test]
    fn test_hasher_debug_does_not_leak_internals() {
        let debug_str = format!("{:?}", fast_hasher());
        assert_eq!(debug_str, "PasswordHasher { .. }");
    }
}
