//! Bearer token issuing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};

pub const MSG_INVALID_TOKEN: &str = "Invalid or expired token";

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64, // Vendor ID
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and validates vendor session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_secs: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_in_secs: config.expires_in_secs,
        }
    }

    /// Issue a signed token for a vendor
    pub fn issue(&self, vendor_id: i64, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: vendor_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expires_in_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate signature and expiry and return the claims
    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized(MSG_INVALID_TOKEN.to_string())
            })
    }
}
