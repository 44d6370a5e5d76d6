//! Authentication middleware
//!
//! Bearer token authentication for the vendor management routes

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::TokenIssuer;
use crate::AppState;

pub const MSG_HEADER_MISSING: &str = "Authorization header missing";
pub const MSG_HEADER_INVALID: &str = "Invalid authorization header";

/// Authenticated vendor information extracted from the token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthVendor {
    pub vendor_id: i64,
    pub email: String,
}

/// Validate the bearer token and attach the caller to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized(MSG_HEADER_MISSING.to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized(MSG_HEADER_INVALID.to_string()))?;

    let claims = TokenIssuer::new(&state.config.jwt).verify(token)?;

    request.extensions_mut().insert(AuthVendor {
        vendor_id: claims.id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// `Bearer <token>` with exactly one space and a non-empty token
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Extractor for the authenticated vendor
/// Only available on routes behind `auth_middleware`
#[derive(Clone, Debug)]
pub struct CurrentVendor(pub AuthVendor);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentVendor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthVendor>()
            .cloned()
            .map(CurrentVendor)
            .ok_or_else(|| AppError::Unauthorized(MSG_HEADER_MISSING.to_string()))
    }
}
