//! Validation utilities.

use crate::RadiusxError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a [`RadiusxError::Validation`] on failure.
    fn validate_request(&self) -> Result<(), RadiusxError> {
        self.validate().map_err(validation_errors_to_radiusx_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to a single validation error.
///
/// Fields are sorted so the message is stable across runs.
#[must_use]
pub fn validation_errors_to_radiusx_error(errors: ValidationErrors) -> RadiusxError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    messages.sort();

    RadiusxError::Validation(messages.join("; "))
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "too short"))]
        password: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_ok() {
        let probe = Probe {
            email: "a@x.com".to_string(),
            password: "long-enough".to_string(),
        };
        assert!(probe.validate_request().is_ok());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let probe = Probe {
            email: "nope".to_string(),
            password: "pw".to_string(),
        };
        match probe.validate_request() {
            Err(RadiusxError::Validation(message)) => {
                assert_eq!(message, "email: email; password: too short");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
