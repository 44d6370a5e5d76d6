//! PostgreSQL vendor store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::PageRequest;
use sqlx::PgPool;

use super::{NewVendorRecord, VendorRecord, VendorRecordChanges, VendorStore};
use crate::error::{AppError, AppResult};

const VENDOR_COLUMNS: &str = "id, company_name, contact_person_name, email, password_hash, \
     phone_number, business_type, address, country, gst_number, logo, is_verified, \
     created_at, updated_at";

/// Vendor store backed by the `vendors` table
#[derive(Clone)]
pub struct PgVendorStore {
    db: PgPool,
}

/// Raw row as returned by Postgres
#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: i64,
    company_name: String,
    contact_person_name: String,
    email: String,
    password_hash: String,
    phone_number: String,
    business_type: String,
    address: Option<String>,
    country: String,
    gst_number: String,
    logo: Option<String>,
    is_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for VendorRecord {
    type Error = AppError;

    fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
        let business_type = row.business_type.parse().map_err(|_| {
            AppError::Internal(format!(
                "Vendor {} has unknown business_type {:?}",
                row.id, row.business_type
            ))
        })?;
        let country = row.country.parse().map_err(|_| {
            AppError::Internal(format!("Vendor {} has unknown country {:?}", row.id, row.country))
        })?;

        Ok(VendorRecord {
            id: row.id,
            company_name: row.company_name,
            contact_person_name: row.contact_person_name,
            email: row.email,
            password_hash: row.password_hash,
            phone_number: row.phone_number,
            business_type,
            address: row.address,
            country,
            gst_number: row.gst_number,
            logo: row.logo,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgVendorStore {
    /// Create a new PgVendorStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch_one_by_id(&self, id: i64) -> AppResult<Option<VendorRecord>> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {} FROM vendors WHERE id = $1",
            VENDOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(VendorRecord::try_from).transpose()
    }
}

/// Map a unique-index violation to the friendly conflict error
fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::EmailTaken,
        _ => AppError::DatabaseError(err),
    }
}

/// `%term%` for ILIKE with wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl VendorStore for PgVendorStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<VendorRecord>> {
        self.fetch_one_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<VendorRecord>> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {} FROM vendors WHERE LOWER(email) = LOWER($1)",
            VENDOR_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        row.map(VendorRecord::try_from).transpose()
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> AppResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vendors
                WHERE LOWER(email) = LOWER($1)
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(&self.db)
        .await?;

        Ok(taken)
    }

    async fn insert(&self, vendor: NewVendorRecord) -> AppResult<VendorRecord> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            r#"
            INSERT INTO vendors (company_name, contact_person_name, email, password_hash,
                                 phone_number, business_type, address, country, gst_number, logo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(&vendor.company_name)
        .bind(&vendor.contact_person_name)
        .bind(&vendor.email)
        .bind(&vendor.password_hash)
        .bind(&vendor.phone_number)
        .bind(vendor.business_type.as_str())
        .bind(&vendor.address)
        .bind(vendor.country.as_str())
        .bind(&vendor.gst_number)
        .bind(&vendor.logo)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        VendorRecord::try_from(row)
    }

    async fn update(
        &self,
        id: i64,
        changes: VendorRecordChanges,
    ) -> AppResult<Option<VendorRecord>> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            r#"
            UPDATE vendors SET
                company_name = COALESCE($2, company_name),
                contact_person_name = COALESCE($3, contact_person_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                phone_number = COALESCE($6, phone_number),
                business_type = COALESCE($7, business_type),
                address = COALESCE($8, address),
                country = COALESCE($9, country),
                gst_number = COALESCE($10, gst_number),
                logo = COALESCE($11, logo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(id)
        .bind(&changes.company_name)
        .bind(&changes.contact_person_name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.phone_number)
        .bind(changes.business_type.map(|t| t.as_str()))
        .bind(&changes.address)
        .bind(changes.country.map(|c| c.as_str()))
        .bind(&changes.gst_number)
        .bind(&changes.logo)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?;

        row.map(VendorRecord::try_from).transpose()
    }

    async fn mark_verified(&self, id: i64) -> AppResult<Option<VendorRecord>> {
        sqlx::query(
            "UPDATE vendors SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 AND is_verified = FALSE",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        self.fetch_one_by_id(id).await
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<VendorRecord>, u64)> {
        let pattern = page.search.as_deref().map(like_pattern);
        let filter = "($1::TEXT IS NULL OR company_name ILIKE $1 OR email ILIKE $1)";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM vendors WHERE {}",
            filter
        ))
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {} FROM vendors WHERE {} ORDER BY id DESC LIMIT $2 OFFSET $3",
            VENDOR_COLUMNS, filter
        ))
        .bind(&pattern)
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await?;

        let vendors = rows
            .into_iter()
            .map(VendorRecord::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((vendors, u64::try_from(total).unwrap_or_default()))
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db).await.is_ok()
    }
}
