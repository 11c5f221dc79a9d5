//! Exception number model (plates excluded from attendance accounting)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Excluded plate number (e.g. staff vehicles)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExceptionNumber {
    pub id: i32,
    /// Plate number
    pub number: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create exception number request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExceptionNumber {
    /// Plate number to exclude
    #[validate(length(min = 1, max = 32))]
    pub number: String,
}
