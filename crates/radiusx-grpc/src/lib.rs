//! # RadiusX gRPC
//!
//! Tonic transport for the RadiusX users service: the `radiusx.users.v1`
//! contract, request validation, status mapping and health checks.

pub mod proto;
pub mod server;
pub mod services;

pub use server::*;
pub use services::*;
