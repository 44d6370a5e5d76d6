//! Domain models for the vendor marketplace

mod vendor;

pub use vendor::*;
