//! Scan record model (one row per plate observation)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Plate observation as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScanRecord {
    pub id: i32,
    /// Plate number
    pub number: String,
    /// Day of the scan
    #[sqlx(rename = "scan_date")]
    pub date: NaiveDate,
    /// Wall-clock time of the scan (no timezone)
    #[sqlx(rename = "scan_time")]
    pub time: NaiveTime,
    /// Image reference (relative storage path, or public URL once published)
    pub image_url: Option<String>,
}

impl ScanRecord {
    /// Prefix the stored image path with the public base URL
    pub fn published(mut self, base_url: &str) -> Self {
        self.image_url = self.image_url.map(|path| format!("{}{}", base_url, path));
        self
    }
}

/// Scan ingestion parameters (sent as query string next to the multipart image)
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct CreateScan {
    /// Plate number (8 characters, e.g. 95A123BB)
    #[serde(rename = "car-number")]
    #[validate(length(equal = 8, message = "Number must be 8 characters"))]
    pub number: String,
    /// Scan date (YYYY-MM-DD)
    #[serde(rename = "car-date")]
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    /// Scan time (HH:MM:SS)
    #[serde(rename = "car-time")]
    #[validate(custom(function = "validate_time"))]
    pub time: String,
}

/// Unknown-plate ingestion parameters; the number is free text
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct CreateUnknownScan {
    /// Placeholder number (e.g. "unknown")
    #[serde(rename = "car-number")]
    #[validate(length(min = 1, max = 32))]
    pub number: String,
    /// Scan date (YYYY-MM-DD)
    #[serde(rename = "car-date")]
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    /// Scan time (HH:MM:SS)
    #[serde(rename = "car-time")]
    #[validate(custom(function = "validate_time"))]
    pub time: String,
}

/// Validated scan fields ready for insertion
#[derive(Debug, Clone)]
pub struct NewScan {
    pub number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub image_url: String,
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if value.len() != 8 {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S").ok()
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("Date must be 10 characters and format YYYY-MM-DD"))
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    parse_time(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("Time must be 8 characters and format HH:MM:SS"))
}

/// Pagination query parameters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number (1-based, default 1)
    pub page: Option<i64>,
    /// Records per page (default 10)
    pub limit: Option<i64>,
}

/// Day view query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DayQuery {
    /// Day (YYYY-MM-DD), defaults to today in market time
    pub day: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Week view query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct WeekQuery {
    /// ISO week (YYYY-WW), defaults to the current week
    pub week: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Month view query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month (YYYY-MM), defaults to the current month
    pub month: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Single car / snapshot query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CarQuery {
    /// Day (YYYY-MM-DD) or month (YYYY-MM)
    pub date: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query selecting a day, or a month where the endpoint accepts one
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DateQuery {
    /// Day (YYYY-MM-DD) or month (YYYY-MM)
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_scan_validation() {
        let ok = CreateScan {
            number: "95A123BB".to_string(),
            date: "2024-01-01".to_string(),
            time: "08:15:00".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = CreateScan {
            number: "95A12".to_string(),
            ..ok
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_parse_rejects_loose_formats() {
        assert!(parse_date("2024-1-01").is_none());
        assert!(parse_time("8:15:00").is_none());
        assert_eq!(parse_time("08:15:00"), NaiveTime::from_hms_opt(8, 15, 0));
    }

    #[test]
    fn test_published_prefixes_image() {
        let record = ScanRecord {
            id: 1,
            number: "95A123BB".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            image_url: Some("/storage/a.jpg".to_string()),
        };
        let published = record.published("http://cdn");
        assert_eq!(published.image_url.as_deref(), Some("http://cdn/storage/a.jpg"));
    }
}
