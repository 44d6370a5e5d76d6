//! Shared types, models and validation for the vendor management platform
//!
//! Pure domain code with no I/O, used by the backend server and its tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
