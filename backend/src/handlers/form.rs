//! Request body extraction for vendor payloads
//!
//! Vendor endpoints accept `multipart/form-data` (with an optional `logo`
//! file), urlencoded forms and JSON objects. All of them are flattened to
//! text fields before validation.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde_json::Value;
use shared::VendorInput;

use crate::error::AppError;
use crate::services::logo::{LogoUpload, MSG_LOGO_TOO_LARGE};

pub const MSG_UNSUPPORTED_CONTENT_TYPE: &str = "Unsupported content type";
pub const MSG_JSON_NOT_OBJECT: &str = "Request body must be a JSON object";

const LOGO_FIELD: &str = "logo";

/// Text fields and optional logo from a submitted form
#[derive(Debug, Default)]
pub struct VendorForm {
    pub fields: Vec<(String, String)>,
    pub logo: Option<LogoUpload>,
}

impl VendorForm {
    /// Fields as a vendor payload; repeated names keep the last value
    pub fn input(&self) -> VendorInput {
        let mut input = VendorInput::default();
        for (name, value) in &self.fields {
            input.set(name, value.clone());
        }
        input
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = VendorForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == LOGO_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                form.logo = Some(LogoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field.text().await.map_err(multipart_error)?;
                form.fields.push((name, text));
            }
        }

        Ok(form)
    }

    fn from_json(value: Value) -> Result<Self, AppError> {
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest(MSG_JSON_NOT_OBJECT.to_string()));
        };

        let fields = map
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((name, text))
            })
            .collect();

        Ok(Self { fields, logo: None })
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest(MSG_LOGO_TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for VendorForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type.as_deref() {
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Self::from_multipart(multipart).await
            }
            Some(ct) if ct.starts_with("application/json") => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Self::from_json(value)
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self { fields, logo: None })
            }
            // No body at all, e.g. a logo-less PUT with nothing to change
            None => Ok(Self::default()),
            Some(_) => Err(AppError::BadRequest(MSG_UNSUPPORTED_CONTENT_TYPE.to_string())),
        }
    }
}
