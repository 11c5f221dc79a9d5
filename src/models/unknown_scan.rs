//! Unknown scan model (observations whose plate could not be read)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UnknownScan {
    pub id: i32,
    pub number: String,
    #[sqlx(rename = "scan_date")]
    pub date: NaiveDate,
    #[sqlx(rename = "scan_time")]
    pub time: NaiveTime,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of a purge
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResult {
    pub date: NaiveDate,
    /// Number of deleted rows
    pub deleted: u64,
}
