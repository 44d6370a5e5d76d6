//! Business logic services for the vendor management platform

pub mod credentials;
pub mod logo;
pub mod token;
pub mod vendor;

pub use logo::LogoStorage;
pub use token::TokenIssuer;
pub use vendor::VendorService;
