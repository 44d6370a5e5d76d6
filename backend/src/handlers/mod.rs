//! HTTP handlers

pub mod auth;
pub mod form;
pub mod health;
pub mod vendor;

pub use auth::{login, register};
pub use health::{health_check, root};
pub use vendor::{
    create_vendor, delete_vendor, get_vendor, get_vendor_logo, list_vendors, update_vendor,
    verify_vendor,
};
