//! In-process vendor store used by unit tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use shared::PageRequest;

use super::{NewVendorRecord, VendorRecord, VendorRecordChanges, VendorStore};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    vendors: BTreeMap<i64, VendorRecord>,
}

/// Same contract as `PgVendorStore`, including the case-insensitive unique
/// email rule, held behind a mutex.
#[derive(Default)]
pub struct MemoryVendorStore {
    state: Mutex<MemoryState>,
}

impl MemoryVendorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().vendors.len()
    }
}

fn email_in_use(state: &MemoryState, email: &str, except_id: Option<i64>) -> bool {
    state
        .vendors
        .values()
        .any(|v| Some(v.id) != except_id && v.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl VendorStore for MemoryVendorStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<VendorRecord>> {
        Ok(self.state.lock().unwrap().vendors.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<VendorRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .vendors
            .values()
            .find(|v| v.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> AppResult<bool> {
        Ok(email_in_use(&self.state.lock().unwrap(), email, except_id))
    }

    async fn insert(&self, vendor: NewVendorRecord) -> AppResult<VendorRecord> {
        let mut state = self.state.lock().unwrap();
        if email_in_use(&state, &vendor.email, None) {
            return Err(AppError::EmailTaken);
        }

        state.next_id += 1;
        let now = Utc::now();
        let record = VendorRecord {
            id: state.next_id,
            company_name: vendor.company_name,
            contact_person_name: vendor.contact_person_name,
            email: vendor.email,
            password_hash: vendor.password_hash,
            phone_number: vendor.phone_number,
            business_type: vendor.business_type,
            address: vendor.address,
            country: vendor.country,
            gst_number: vendor.gst_number,
            logo: vendor.logo,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        state.vendors.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        changes: VendorRecordChanges,
    ) -> AppResult<Option<VendorRecord>> {
        let mut state = self.state.lock().unwrap();
        if let Some(email) = &changes.email {
            if email_in_use(&state, email, Some(id)) {
                return Err(AppError::EmailTaken);
            }
        }

        let Some(record) = state.vendors.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(v) = changes.company_name {
            record.company_name = v;
        }
        if let Some(v) = changes.contact_person_name {
            record.contact_person_name = v;
        }
        if let Some(v) = changes.email {
            record.email = v;
        }
        if let Some(v) = changes.password_hash {
            record.password_hash = v;
        }
        if let Some(v) = changes.phone_number {
            record.phone_number = v;
        }
        if let Some(v) = changes.business_type {
            record.business_type = v;
        }
        if let Some(v) = changes.address {
            record.address = Some(v);
        }
        if let Some(v) = changes.country {
            record.country = v;
        }
        if let Some(v) = changes.gst_number {
            record.gst_number = v;
        }
        if let Some(v) = changes.logo {
            record.logo = Some(v);
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn mark_verified(&self, id: i64) -> AppResult<Option<VendorRecord>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.vendors.get_mut(&id).map(|record| {
            if !record.is_verified {
                record.is_verified = true;
                record.updated_at = Utc::now();
            }
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().unwrap().vendors.remove(&id).is_some())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<VendorRecord>, u64)> {
        let state = self.state.lock().unwrap();
        let needle = page.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&VendorRecord> = state
            .vendors
            .values()
            .rev()
            .filter(|v| match &needle {
                Some(n) => {
                    v.company_name.to_lowercase().contains(n.as_str())
                        || v.email.to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok((data, total))
    }

    async fn ping(&self) -> bool {
        true
    }
}
