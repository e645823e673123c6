//! # RadiusX Server Library
//!
//! Dependency wiring and startup helpers for the RadiusX users service
//! binary.

pub mod di;
pub mod startup;
