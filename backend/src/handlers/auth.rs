//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shared::VendorSummary;

use crate::error::AppResult;
use crate::handlers::form::VendorForm;
use crate::AppState;

pub const MSG_REGISTERED: &str = "Vendor is registered successfully";

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Response after a vendor is created
#[derive(Serialize)]
pub struct VendorCreatedResponse {
    pub message: &'static str,
    pub vendor: VendorSummary,
}

/// Register vendor endpoint handler
pub async fn register(
    State(state): State<AppState>,
    form: VendorForm,
) -> AppResult<(StatusCode, Json<VendorCreatedResponse>)> {
    let input = form.input();
    let vendor = state.vendors().register(&input, form.logo).await?;

    Ok((
        StatusCode::CREATED,
        Json(VendorCreatedResponse {
            message: MSG_REGISTERED,
            vendor,
        }),
    ))
}

/// Login endpoint handler
pub async fn login(State(state): State<AppState>, form: VendorForm) -> AppResult<Json<LoginResponse>> {
    let token = state
        .vendors()
        .login(form.value("email"), form.value("password"))
        .await?;

    Ok(Json(LoginResponse { token }))
}
