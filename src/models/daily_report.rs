//! Daily report model (persisted snapshot of one day's classification)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;

use crate::engine::frequency::RankedEntry;

/// Stored daily report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DailyReport {
    pub id: i32,
    /// Reported day
    #[sqlx(rename = "report_date")]
    pub date: NaiveDate,
    /// Qualifying cars among the day's leaderboard
    #[schema(value_type = Vec<RankedEntry>)]
    pub top10: Json<Vec<RankedEntry>>,
    /// All qualifying cars
    #[schema(value_type = Vec<RankedEntry>)]
    pub general: Json<Vec<RankedEntry>>,
    /// Number of qualifying (paid) cars
    pub general_count: i32,
    /// Sum of visits of the qualifying cars
    pub general_attendances_count: i32,
    /// Distinct cars seen that day
    pub overall_count: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Daily reports lookup: a single day or every stored day of a month
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DailyReportLookup {
    Day(Option<DailyReport>),
    Month(Vec<DailyReport>),
}
