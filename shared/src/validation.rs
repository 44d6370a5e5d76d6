//! Validation rules for vendor records
//!
//! The vendor validator works on a whole candidate payload rather than on
//! isolated fields: the tax-ID rule depends on the `country` submitted in
//! the same payload. Every field contributes at most one error and all
//! errors are collected before returning.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{BusinessType, Country, NewVendor, VendorChanges, VendorInput};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 150;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const GST_MAX_LEN: usize = 15;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PHONE_LEN: usize = 10;

pub const MSG_INVALID_EMAIL: &str = "Invalid email";
pub const MSG_EMAIL_TOO_LONG: &str = "Email length can't be exceed 150 characters";
pub const MSG_WEAK_PASSWORD: &str =
    "Password must be at least 8 characters, include 1 uppercase, 1 lowercase, and 1 symbol.";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_PHONE_LENGTH: &str = "Phone number must be 10 digits";
pub const MSG_INVALID_BUSINESS_TYPE: &str = "Invalid business type";
pub const MSG_INVALID_COUNTRY: &str = "Invalid country";
pub const MSG_ADDRESS_TOO_LONG: &str = "Address length can't be exceed 255 characters";
pub const MSG_GST_REQUIRED: &str = "GST Number / Tax ID is required";
pub const MSG_GST_TOO_LONG: &str = "GST Number / Tax ID can't exceed 15 characters";
pub const MSG_INVALID_GST_INDIA: &str = "Invalid GST number format for India. It should be 15 characters long and with valid structure i.e. 07ABCDE1234F2Z5";
pub const MSG_INVALID_TAX_ID_GLOBAL: &str =
    "Invalid Tax ID format for Global. It should be alphanumeric and 5-15 characters long.";
pub const MSG_INVALID_VENDOR_ID: &str = "Invalid vendor id";

const COMPANY_NAME: &str = "Company name";
const CONTACT_PERSON_NAME: &str = "Contact person name";

// ============================================================================
// Error types
// ============================================================================

/// Where an offending value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
    Query,
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

/// Ordered batch of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a body field. Password values are never echoed.
    pub fn add(&mut self, path: &str, value: Option<&str>, msg: impl Into<String>) {
        self.push(path, value, msg, Location::Body);
    }

    pub fn push(
        &mut self,
        path: &str,
        value: Option<&str>,
        msg: impl Into<String>,
        location: Location,
    ) {
        let value = if path == "password" {
            None
        } else {
            value.map(str::to_string)
        };
        self.0.push(FieldError {
            value,
            msg: msg.into(),
            path: path.to_string(),
            location,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The error recorded for `path`, if any
    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.path == path)
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.path, e.msg))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Patterns
// ============================================================================

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9 ]+$").expect("valid name pattern"))
}

fn india_gst_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9]Z[0-9A-Z]$").expect("valid GST pattern")
    })
}

fn global_tax_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{5,15}$").expect("valid tax ID pattern"))
}

// ============================================================================
// Field rules
// ============================================================================

/// Validate a company or contact person name and return it trimmed
pub fn validate_name(value: &str, label: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if !name_regex().is_match(trimmed) {
        return Err(format!("{} must be alphanumeric", label));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(format!(
            "{} length can't be exceed {} characters",
            label, NAME_MAX_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate email syntax and length
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !validator::validate_email(email) {
        return Err(MSG_INVALID_EMAIL);
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(MSG_EMAIL_TOO_LONG);
    }
    Ok(())
}

/// Validate password strength: 8+ characters with an uppercase letter, a
/// lowercase letter and a symbol (anything that is not an ASCII letter or
/// digit).
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_lower && has_upper && has_symbol {
        Ok(())
    } else {
        Err(MSG_WEAK_PASSWORD)
    }
}

/// Validate a 10-digit phone number
pub fn validate_phone_number(phone: &str) -> Result<(), &'static str> {
    if phone.len() != PHONE_LEN || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(MSG_PHONE_LENGTH);
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), &'static str> {
    if address.chars().count() > ADDRESS_MAX_LEN {
        return Err(MSG_ADDRESS_TOO_LONG);
    }
    Ok(())
}

/// Validate a GST number / tax ID against the country submitted with it.
///
/// Without a country only presence and the column width are checked.
pub fn validate_gst_number(gst_number: &str, country: Option<Country>) -> Result<(), &'static str> {
    if gst_number.is_empty() {
        return Err(MSG_GST_REQUIRED);
    }
    match country {
        Some(Country::India) if !india_gst_regex().is_match(gst_number) => {
            Err(MSG_INVALID_GST_INDIA)
        }
        Some(Country::Global) if !global_tax_id_regex().is_match(gst_number) => {
            Err(MSG_INVALID_TAX_ID_GLOBAL)
        }
        None if gst_number.chars().count() > GST_MAX_LEN => Err(MSG_GST_TOO_LONG),
        _ => Ok(()),
    }
}

// ============================================================================
// Record validation
// ============================================================================

/// Validate a full vendor payload for registration or admin creation
pub fn validate_new_vendor(input: &VendorInput) -> Result<NewVendor, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let company_name = check_name(&mut errors, "company_name", COMPANY_NAME, input.company_name.as_deref());
    let contact_person_name = check_name(
        &mut errors,
        "contact_person_name",
        CONTACT_PERSON_NAME,
        input.contact_person_name.as_deref(),
    );

    let email = input.email.as_deref().unwrap_or_default();
    if let Err(msg) = validate_email(email) {
        errors.add("email", input.email.as_deref(), msg);
    }

    let password = input.password.as_deref().unwrap_or_default();
    if let Err(msg) = validate_password(password) {
        errors.add("password", None, msg);
    }

    let phone_number = input.phone_number.as_deref().unwrap_or_default();
    if let Err(msg) = validate_phone_number(phone_number) {
        errors.add("phone_number", input.phone_number.as_deref(), msg);
    }

    let business_type = check_business_type(&mut errors, input.business_type.as_deref());

    if let Some(address) = input.address.as_deref() {
        if let Err(msg) = validate_address(address) {
            errors.add("address", Some(address), msg);
        }
    }

    let country = check_country(&mut errors, input.country.as_deref());

    let gst_number = input.gst_number.as_deref().unwrap_or_default();
    if let Err(msg) = validate_gst_number(gst_number, submitted_country(input)) {
        errors.add("gst_number", input.gst_number.as_deref(), msg);
    }

    match (company_name, contact_person_name, business_type, country) {
        (Some(company_name), Some(contact_person_name), Some(business_type), Some(country))
            if errors.is_empty() =>
        {
            Ok(NewVendor {
                company_name,
                contact_person_name,
                email: email.to_string(),
                password: password.to_string(),
                phone_number: phone_number.to_string(),
                business_type,
                address: input.address.clone(),
                country,
                gst_number: gst_number.to_string(),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a partial update payload. Only supplied fields are checked.
///
/// The tax ID is checked against the `country` in the same payload, so
/// changing `country` alone does not re-check the stored tax ID.
pub fn validate_vendor_changes(input: &VendorInput) -> Result<VendorChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut changes = VendorChanges::default();

    if let Some(value) = input.company_name.as_deref() {
        changes.company_name = check_name(&mut errors, "company_name", COMPANY_NAME, Some(value));
    }
    if let Some(value) = input.contact_person_name.as_deref() {
        changes.contact_person_name =
            check_name(&mut errors, "contact_person_name", CONTACT_PERSON_NAME, Some(value));
    }
    if let Some(email) = input.email.as_deref() {
        match validate_email(email) {
            Ok(()) => changes.email = Some(email.to_string()),
            Err(msg) => errors.add("email", Some(email), msg),
        }
    }
    if let Some(password) = input.password.as_deref() {
        match validate_password(password) {
            Ok(()) => changes.password = Some(password.to_string()),
            Err(msg) => errors.add("password", None, msg),
        }
    }
    if let Some(phone) = input.phone_number.as_deref() {
        match validate_phone_number(phone) {
            Ok(()) => changes.phone_number = Some(phone.to_string()),
            Err(msg) => errors.add("phone_number", Some(phone), msg),
        }
    }
    if input.business_type.is_some() {
        changes.business_type = check_business_type(&mut errors, input.business_type.as_deref());
    }
    if let Some(address) = input.address.as_deref() {
        match validate_address(address) {
            Ok(()) => changes.address = Some(address.to_string()),
            Err(msg) => errors.add("address", Some(address), msg),
        }
    }
    if input.country.is_some() {
        changes.country = check_country(&mut errors, input.country.as_deref());
    }
    if let Some(gst_number) = input.gst_number.as_deref() {
        match validate_gst_number(gst_number, submitted_country(input)) {
            Ok(()) => changes.gst_number = Some(gst_number.to_string()),
            Err(msg) => errors.add("gst_number", Some(gst_number), msg),
        }
    }

    errors.into_result(changes)
}

/// Validate login credentials before looking the vendor up
pub fn validate_login(email: Option<&str>, password: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !validator::validate_email(email.unwrap_or_default()) {
        errors.add("email", email, MSG_INVALID_EMAIL);
    }
    if password.map_or(true, str::is_empty) {
        errors.add("password", None, MSG_PASSWORD_REQUIRED);
    }

    errors.into_result(())
}

/// Parse a vendor id path parameter
pub fn validate_vendor_id(raw: &str) -> Result<i64, ValidationErrors> {
    raw.parse::<i64>().map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.push("id", Some(raw), MSG_INVALID_VENDOR_ID, Location::Params);
        errors
    })
}

fn check_name(
    errors: &mut ValidationErrors,
    path: &str,
    label: &str,
    value: Option<&str>,
) -> Option<String> {
    match validate_name(value.unwrap_or_default(), label) {
        Ok(name) => Some(name),
        Err(msg) => {
            errors.add(path, value, msg);
            None
        }
    }
}

fn check_business_type(errors: &mut ValidationErrors, value: Option<&str>) -> Option<BusinessType> {
    match value.map(str::parse::<BusinessType>) {
        Some(Ok(business_type)) => Some(business_type),
        _ => {
            errors.add("business_type", value, MSG_INVALID_BUSINESS_TYPE);
            None
        }
    }
}

fn check_country(errors: &mut ValidationErrors, value: Option<&str>) -> Option<Country> {
    match value.map(str::parse::<Country>) {
        Some(Ok(country)) => Some(country),
        _ => {
            errors.add("country", value, MSG_INVALID_COUNTRY);
            None
        }
    }
}

fn submitted_country(input: &VendorInput) -> Option<Country> {
    input.country.as_deref().and_then(|c| c.parse().ok())
}
