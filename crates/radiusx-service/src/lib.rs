//! # RadiusX Service
//!
//! User orchestration for the RadiusX users service: credential hashing,
//! the store of record and a cache-aside layer in front of it.
//!
//! ```text
//!   gRPC ──▶ UserService ──┬──▶ PasswordHasherInterface
//!                          ├──▶ CacheInterface  (user:<id>, users:<skip>:<limit>)
//!                          └──▶ UserRepository  (Postgres)
//! ```

pub mod cache;
pub mod service_impl;
pub mod user_service;

pub use cache::*;
pub use service_impl::*;
pub use user_service::*;
