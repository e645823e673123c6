//! Domain entities and value objects.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::{NewUser, User, UserUpdate};
