//! # RadiusX Core
//!
//! Domain model, error taxonomy and request context for the RadiusX users
//! service. Every other crate in the workspace builds on these types.

pub mod context;
pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use context::*;
pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use telemetry::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
