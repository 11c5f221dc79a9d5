//! API handlers for Market Scan REST endpoints

pub mod attendance_window;
pub mod cars;
pub mod daily_reports;
pub mod exception_numbers;
pub mod export;
pub mod health;
pub mod openapi;
pub mod unknown_cars;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    extract::Multipart,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::OperatorClaims,
    AppState,
};

/// Extractor for authenticated operator from JWT token
pub struct AuthenticatedUser(pub OperatorClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| AppError::Authentication(e.to_string()))?;

        let claims = OperatorClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Multipart body of the ingestion endpoints
#[derive(Deserialize, ToSchema)]
pub struct ImageUpload {
    /// Camera frame (jpg, png or webp)
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Uploaded image bytes with the client's file name
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

/// Read the `image` part of a multipart body; other parts are ignored
pub async fn read_image(mut multipart: Multipart) -> AppResult<UploadedImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(UploadedImage {
            bytes: bytes.to_vec(),
            file_name,
        });
    }
    Err(AppError::Validation("Image is required".to_string()))
}

/// Strict `YYYY-MM-DD`
pub fn parse_day(value: &str) -> AppResult<NaiveDate> {
    crate::models::scan::parse_date(value).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid date {:?}, expected YYYY-MM-DD", value))
    })
}
