//! # RadiusX Repository
//!
//! Store of record for the users service.
//!
//! ```text
//! UserService
//!   ↓  Arc<dyn UserRepository>
//! PgUserRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
