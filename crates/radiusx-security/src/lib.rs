//! # RadiusX Security
//!
//! One-way credential transform used before a password reaches the store.

pub mod password;

pub use password::*;
