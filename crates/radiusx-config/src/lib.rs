//! # RadiusX Config
//!
//! Configuration for the RadiusX users service, layered from TOML files
//! and environment variables.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
