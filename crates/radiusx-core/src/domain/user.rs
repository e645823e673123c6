//! User entity and its write-side inputs.

use super::Role;
use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted user account.
///
/// The serialized form carries the stored credential hash so that cached
/// snapshots round-trip equal to the store row. Transport layers must not
/// expose `password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, immutable once persisted.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Unique email address.
    pub email: String,

    /// Hashed credential. Never plaintext.
    pub password: String,

    /// Account role.
    pub role: Role,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Registration input.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plaintext on the way into the service, hashed on the way to the store.
    pub password: String,
    pub role: Role,
}

impl NewUser {
    /// Creates a registration with the baseline role.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: Role::default(),
        }
    }

    /// Overrides the role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Returns a copy carrying `password` in place of the current credential.
    #[must_use]
    pub fn with_password(&self, password: String) -> Self {
        Self {
            password,
            ..self.clone()
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update input. `None` and empty strings both mean "keep existing".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UserUpdate {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// The incoming name, if set and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// The incoming email, if set and non-empty.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }

    /// The incoming credential, if set and non-empty.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        non_empty(self.password.as_deref())
    }

    /// True when name, email and credential are all unset.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name().is_none() && self.email().is_none() && self.password().is_none()
    }

    /// True when both name and email are set and equal to `existing`'s.
    ///
    /// Role and credential are not compared.
    #[must_use]
    pub fn matches_profile(&self, existing: &User) -> bool {
        self.name() == Some(existing.name.as_str()) && self.email() == Some(existing.email.as_str())
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
