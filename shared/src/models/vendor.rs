//! Vendor models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of business a vendor operates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BusinessType {
    Manufacturer,
    Distributor,
    Wholesaler,
    Retailer,
    Service,
}

impl BusinessType {
    pub const ALL: [BusinessType; 5] = [
        BusinessType::Manufacturer,
        BusinessType::Distributor,
        BusinessType::Wholesaler,
        BusinessType::Retailer,
        BusinessType::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Manufacturer => "Manufacturer",
            BusinessType::Distributor => "Distributor",
            BusinessType::Wholesaler => "Wholesaler",
            BusinessType::Retailer => "Retailer",
            BusinessType::Service => "Service",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Tax jurisdiction a vendor is registered under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Country {
    India,
    Global,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::India => "India",
            Country::Global => "Global",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "India" => Ok(Country::India),
            "Global" => Ok(Country::Global),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A string that is not a member of the expected enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// Raw vendor fields as submitted by a client.
///
/// Every field is optional: creation requires most of them, a partial
/// update only touches the ones present.
#[derive(Clone, Default)]
pub struct VendorInput {
    pub company_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub business_type: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub gst_number: Option<String>,
}

impl VendorInput {
    /// Assign a field by its wire name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "company_name" => &mut self.company_name,
            "contact_person_name" => &mut self.contact_person_name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "phone_number" => &mut self.phone_number,
            "business_type" => &mut self.business_type,
            "address" => &mut self.address,
            "country" => &mut self.country,
            "gst_number" => &mut self.gst_number,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl fmt::Debug for VendorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorInput")
            .field("company_name", &self.company_name)
            .field("contact_person_name", &self.contact_person_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("phone_number", &self.phone_number)
            .field("business_type", &self.business_type)
            .field("address", &self.address)
            .field("country", &self.country)
            .field("gst_number", &self.gst_number)
            .finish()
    }
}

/// A fully validated vendor ready to be persisted
#[derive(Clone, PartialEq, Eq)]
pub struct NewVendor {
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    /// Plaintext; hashed by the backend before it is stored
    pub password: String,
    pub phone_number: String,
    pub business_type: BusinessType,
    pub address: Option<String>,
    pub country: Country,
    pub gst_number: String,
}

impl fmt::Debug for NewVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewVendor")
            .field("company_name", &self.company_name)
            .field("contact_person_name", &self.contact_person_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .field("business_type", &self.business_type)
            .field("address", &self.address)
            .field("country", &self.country)
            .field("gst_number", &self.gst_number)
            .finish()
    }
}

/// Validated partial update. `None` leaves the stored value unchanged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VendorChanges {
    pub company_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub business_type: Option<BusinessType>,
    pub address: Option<String>,
    pub country: Option<Country>,
    pub gst_number: Option<String>,
}

impl fmt::Debug for VendorChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorChanges")
            .field("company_name", &self.company_name)
            .field("contact_person_name", &self.contact_person_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("phone_number", &self.phone_number)
            .field("business_type", &self.business_type)
            .field("address", &self.address)
            .field("country", &self.country)
            .field("gst_number", &self.gst_number)
            .finish()
    }
}

/// Public view of a vendor. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorProfile {
    pub id: i64,
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
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

/// Minimal projection returned after a vendor is created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VendorSummary {
    pub id: i64,
    pub company_name: String,
    pub email: String,
}
