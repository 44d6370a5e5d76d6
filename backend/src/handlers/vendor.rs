//! Vendor management HTTP handlers

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{validate_vendor_id, PageRequest, Paginated, VendorProfile};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::VendorCreatedResponse;
use crate::handlers::form::VendorForm;
use crate::middleware::CurrentVendor;
use crate::AppState;

pub const MSG_CREATED: &str = "Vendor is created successfully";
pub const MSG_UPDATED: &str = "Vendor details updated successfully";
pub const MSG_DELETED: &str = "Vendor deleted successfully";
pub const MSG_VERIFIED: &str = "Vendor verified successfully";

/// Query parameters for listing vendors
#[derive(Debug, Default, Deserialize)]
pub struct ListVendorsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// A message plus the vendor it concerns
#[derive(Serialize)]
pub struct VendorResponse {
    pub message: &'static str,
    pub vendor: VendorProfile,
}

/// List vendors with pagination and search
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<ListVendorsQuery>,
) -> AppResult<Json<Paginated<VendorProfile>>> {
    let page = PageRequest::from_raw(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.search.as_deref(),
    );

    Ok(Json(state.vendors().list(&page).await?))
}

/// Get a specific vendor
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VendorProfile>> {
    let id = validate_vendor_id(&id)?;
    Ok(Json(state.vendors().get(id).await?))
}

/// Create a new vendor
pub async fn create_vendor(
    State(state): State<AppState>,
    CurrentVendor(caller): CurrentVendor,
    form: VendorForm,
) -> AppResult<(StatusCode, Json<VendorCreatedResponse>)> {
    let input = form.input();
    let vendor = state.vendors().create(&input, form.logo).await?;
    tracing::debug!("Vendor {} created by vendor {}", vendor.id, caller.vendor_id);

    Ok((
        StatusCode::CREATED,
        Json(VendorCreatedResponse {
            message: MSG_CREATED,
            vendor,
        }),
    ))
}

/// Update a vendor
pub async fn update_vendor(
    State(state): State<AppState>,
    CurrentVendor(caller): CurrentVendor,
    Path(id): Path<String>,
    form: VendorForm,
) -> AppResult<Json<VendorResponse>> {
    let id = validate_vendor_id(&id)?;
    let input = form.input();
    let vendor = state.vendors().update(id, &input, form.logo).await?;
    tracing::debug!("Vendor {} updated by vendor {}", id, caller.vendor_id);

    Ok(Json(VendorResponse {
        message: MSG_UPDATED,
        vendor,
    }))
}

/// Delete a vendor
pub async fn delete_vendor(
    State(state): State<AppState>,
    CurrentVendor(caller): CurrentVendor,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = validate_vendor_id(&id)?;
    state.vendors().delete(id).await?;
    tracing::debug!("Vendor {} deleted by vendor {}", id, caller.vendor_id);

    Ok(Json(MessageResponse {
        message: MSG_DELETED,
    }))
}

/// Mark a vendor as verified
pub async fn verify_vendor(
    State(state): State<AppState>,
    CurrentVendor(caller): CurrentVendor,
    Path(id): Path<String>,
) -> AppResult<Json<VendorResponse>> {
    let id = validate_vendor_id(&id)?;
    let vendor = state.vendors().verify(id).await?;
    tracing::debug!("Vendor {} verified by vendor {}", id, caller.vendor_id);

    Ok(Json(VendorResponse {
        message: MSG_VERIFIED,
        vendor,
    }))
}

/// Stream a vendor's logo file
pub async fn get_vendor_logo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> AppResult<Response> {
    let id = validate_vendor_id(&id)?;
    let path = state.vendors().logo_path(id).await?;

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .map_err(|e| AppError::Storage(format!("Cannot read logo: {}", e)))?;

    Ok(response.map(Body::new).into_response())
}
