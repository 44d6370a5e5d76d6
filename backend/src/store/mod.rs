//! Vendor persistence
//!
//! `VendorStore` is the seam between the lifecycle service and the
//! database. The store owns the unique-email guarantee: a racing insert or
//! update that collides surfaces as `AppError::EmailTaken`.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{BusinessType, Country, PageRequest, VendorProfile};

use crate::error::AppResult;

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::MemoryVendorStore;
pub use postgres::PgVendorStore;

/// A persisted vendor row, including the password hash.
///
/// Only converted to `VendorProfile` on its way out of the backend.
#[derive(Clone, PartialEq)]
pub struct VendorRecord {
    pub id: i64,
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub business_type: BusinessType,
    pub address: Option<String>,
    pub country: Country,
    pub gst_number: String,
    pub logo: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for VendorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorRecord")
            .field("id", &self.id)
            .field("company_name", &self.company_name)
            .field("email", &self.email)
            .field("business_type", &self.business_type)
            .field("country", &self.country)
            .field("logo", &self.logo)
            .field("is_verified", &self.is_verified)
            .finish_non_exhaustive()
    }
}

impl From<VendorRecord> for VendorProfile {
    fn from(record: VendorRecord) -> Self {
        Self {
            id: record.id,
            company_name: record.company_name,
            contact_person_name: record.contact_person_name,
            email: record.email,
            phone_number: record.phone_number,
            business_type: record.business_type,
            address: record.address,
            country: record.country,
            gst_number: record.gst_number,
            logo: record.logo,
            is_verified: record.is_verified,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Values for a new row
#[derive(Clone)]
pub struct NewVendorRecord {
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub business_type: BusinessType,
    pub address: Option<String>,
    pub country: Country,
    pub gst_number: String,
    pub logo: Option<String>,
}

/// Column updates; `None` keeps the stored value
#[derive(Clone, Default)]
pub struct VendorRecordChanges {
    pub company_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
    pub business_type: Option<BusinessType>,
    pub address: Option<String>,
    pub country: Option<Country>,
    pub gst_number: Option<String>,
    pub logo: Option<String>,
}

#[async_trait]
pub trait VendorStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<VendorRecord>>;

    /// Email lookup, case-insensitive
    async fn find_by_email(&self, email: &str) -> AppResult<Option<VendorRecord>>;

    /// Whether another vendor (other than `except_id`) already uses `email`
    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> AppResult<bool>;

    async fn insert(&self, vendor: NewVendorRecord) -> AppResult<VendorRecord>;

    /// Apply `changes` and bump `updated_at`. `None` if the vendor is absent.
    async fn update(&self, id: i64, changes: VendorRecordChanges)
        -> AppResult<Option<VendorRecord>>;

    /// Set `is_verified`. Already-verified rows are left untouched.
    async fn mark_verified(&self, id: i64) -> AppResult<Option<VendorRecord>>;

    /// Returns false if there was nothing to delete
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// One page ordered by id descending, plus the total match count
    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<VendorRecord>, u64)>;

    async fn ping(&self) -> bool;
}
