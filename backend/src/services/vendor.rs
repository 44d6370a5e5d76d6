//! Vendor lifecycle: registration, login, profile management and verification

use std::path::PathBuf;
use std::sync::Arc;

use shared::{
    validate_login, validate_new_vendor, validate_vendor_changes, PageMeta, PageRequest,
    Paginated, VendorInput, VendorProfile, VendorSummary,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::credentials::PasswordHasher;
use crate::services::logo::{LogoStorage, LogoUpload};
use crate::services::token::TokenIssuer;
use crate::store::{NewVendorRecord, VendorRecordChanges, VendorStore};

pub const MSG_REQUESTED_NOT_FOUND: &str = "Requested vendor not found";
pub const MSG_NOT_FOUND: &str = "Vendor not found";
pub const MSG_NOT_FOUND_FOR_ID: &str = "Vendor is not found for provided id";
pub const MSG_LOGO_NOT_FOUND: &str = "Vendor logo not found";

/// Vendor service
#[derive(Clone)]
pub struct VendorService {
    store: Arc<dyn VendorStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    logos: LogoStorage,
}

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(store: Arc<dyn VendorStore>, config: &Config) -> Self {
        Self {
            store,
            hasher: PasswordHasher::default(),
            tokens: TokenIssuer::new(&config.jwt),
            logos: LogoStorage::new(&config.uploads),
        }
    }

    #[cfg(test)]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Self-service registration
    pub async fn register(
        &self,
        input: &VendorInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<VendorSummary> {
        let vendor = self.insert_vendor(input, logo).await?;
        tracing::info!("Vendor {} registered", vendor.id);
        Ok(vendor)
    }

    /// Vendor creation by an authenticated caller
    pub async fn create(
        &self,
        input: &VendorInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<VendorSummary> {
        let vendor = self.insert_vendor(input, logo).await?;
        tracing::info!("Vendor {} created", vendor.id);
        Ok(vendor)
    }

    async fn insert_vendor(
        &self,
        input: &VendorInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<VendorSummary> {
        let vendor = validate_new_vendor(input)?;
        if let Some(upload) = &logo {
            self.logos.check(upload)?;
        }

        // Fast path; the unique index still decides a race
        if self.store.email_taken(&vendor.email, None).await? {
            return Err(AppError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&vendor.password)?;
        let logo_name = match &logo {
            Some(upload) => Some(self.logos.save(upload).await?),
            None => None,
        };

        let record = NewVendorRecord {
            company_name: vendor.company_name,
            contact_person_name: vendor.contact_person_name,
            email: vendor.email,
            password_hash,
            phone_number: vendor.phone_number,
            business_type: vendor.business_type,
            address: vendor.address,
            country: vendor.country,
            gst_number: vendor.gst_number,
            logo: logo_name.clone(),
        };

        match self.store.insert(record).await {
            Ok(created) => Ok(VendorSummary {
                id: created.id,
                company_name: created.company_name,
                email: created.email,
            }),
            Err(e) => {
                if let Some(name) = logo_name {
                    self.logos.remove(&name).await;
                }
                Err(e)
            }
        }
    }

    /// Exchange credentials for a bearer token
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> AppResult<String> {
        validate_login(email, password)?;
        let email = email.unwrap_or_default();
        let password = password.unwrap_or_default();

        let Some(vendor) = self.store.find_by_email(email).await? else {
            self.hasher.verify_decoy(password);
            tracing::debug!("Login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &vendor.password_hash)? {
            tracing::debug!("Login rejected for vendor {}", vendor.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(vendor.id, &vendor.email)?;
        tracing::info!("Vendor {} logged in", vendor.id);
        Ok(token)
    }

    pub async fn get(&self, id: i64) -> AppResult<VendorProfile> {
        self.store
            .find_by_id(id)
            .await?
            .map(VendorProfile::from)
            .ok_or_else(|| AppError::NotFound(MSG_REQUESTED_NOT_FOUND.to_string()))
    }

    /// One page of vendors, newest first
    pub async fn list(&self, page: &PageRequest) -> AppResult<Paginated<VendorProfile>> {
        let (records, total) = self.store.list(page).await?;

        Ok(Paginated {
            meta: PageMeta::new(total, page),
            data: records.into_iter().map(VendorProfile::from).collect(),
        })
    }

    /// Partial update; fields absent from `input` keep their stored values
    pub async fn update(
        &self,
        id: i64,
        input: &VendorInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<VendorProfile> {
        let changes = validate_vendor_changes(input)?;
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND.to_string()))?;

        if let Some(upload) = &logo {
            self.logos.check(upload)?;
        }

        if let Some(email) = &changes.email {
            if !email.eq_ignore_ascii_case(&existing.email)
                && self.store.email_taken(email, Some(id)).await?
            {
                return Err(AppError::EmailTaken);
            }
        }

        let password_hash = match &changes.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let logo_name = match &logo {
            Some(upload) => Some(self.logos.save(upload).await?),
            None => None,
        };

        let record_changes = VendorRecordChanges {
            company_name: changes.company_name,
            contact_person_name: changes.contact_person_name,
            email: changes.email,
            password_hash,
            phone_number: changes.phone_number,
            business_type: changes.business_type,
            address: changes.address,
            country: changes.country,
            gst_number: changes.gst_number,
            logo: logo_name.clone(),
        };

        let updated = match self.store.update(id, record_changes).await {
            Ok(Some(updated)) => updated,
            result => {
                if let Some(name) = &logo_name {
                    self.logos.remove(name).await;
                }
                return match result {
                    Err(e) => Err(e),
                    // Deleted between the lookup and the write
                    _ => Err(AppError::NotFound(MSG_NOT_FOUND.to_string())),
                };
            }
        };

        if let (Some(old), Some(new)) = (&existing.logo, &logo_name) {
            if old != new {
                self.logos.remove(old).await;
            }
        }

        tracing::info!("Vendor {} updated", id);
        Ok(updated.into())
    }

    /// Remove a vendor. The logo file is removed in the background.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND_FOR_ID.to_string()))?;

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(MSG_NOT_FOUND_FOR_ID.to_string()));
        }

        if let Some(logo) = existing.logo {
            let logos = self.logos.clone();
            tokio::spawn(async move {
                logos.remove(&logo).await;
            });
        }

        tracing::info!("Vendor {} deleted", id);
        Ok(())
    }

    /// Mark a vendor as verified. Verifying twice is a no-op.
    pub async fn verify(&self, id: i64) -> AppResult<VendorProfile> {
        let vendor = self
            .store
            .mark_verified(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND_FOR_ID.to_string()))?;

        tracing::info!("Vendor {} verified", id);
        Ok(vendor.into())
    }

    /// Location on disk of a vendor's logo
    pub async fn logo_path(&self, id: i64) -> AppResult<PathBuf> {
        let not_found = || AppError::NotFound(MSG_LOGO_NOT_FOUND.to_string());

        let vendor = self.store.find_by_id(id).await?.ok_or_else(not_found)?;
        let logo = vendor.logo.ok_or_else(not_found)?;

        if !self.logos.exists(&logo).await {
            tracing::warn!("Vendor {} references missing logo {}", id, logo);
            return Err(not_found());
        }

        self.logos.path_of(&logo).ok_or_else(not_found)
    }
}
