//! Attendance window model (daily paid-presence range and visit threshold)

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Singleton attendance window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceWindow {
    /// Start of the paid window (HH:MM)
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "07:00")]
    pub start_time: NaiveTime,
    /// End of the paid window (HH:MM), inclusive
    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "19:00")]
    pub end_time: NaiveTime,
    /// A car qualifies with strictly more visits than this
    pub min_visits: i32,
    pub modif_date: Option<DateTime<Utc>>,
}

impl AttendanceWindow {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, min_visits: i32) -> Self {
        Self {
            start_time,
            end_time,
            min_visits,
            modif_date: None,
        }
    }

    /// Whether `time` lies in `[start_time, end_time]`, compared at minute
    /// granularity: 19:00:30 is inside a window ending at 19:00
    pub fn contains(&self, time: NaiveTime) -> bool {
        let time = to_minute(time);
        to_minute(self.start_time) <= time && time <= to_minute(self.end_time)
    }

    pub fn min_visits(&self) -> u32 {
        u32::try_from(self.min_visits).unwrap_or(0)
    }
}

/// Update attendance window request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAttendanceWindow {
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    /// Visit threshold; unchanged when omitted
    pub min_visits: Option<i32>,
}

fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Parse `HH:MM`, also accepting `HH:MM:SS`
pub fn parse_hh_mm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hh_mm(&raw).ok_or_else(|| de::Error::custom(format!("invalid time {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = AttendanceWindow::new(hm(7, 0), hm(19, 0), 2);
        assert!(window.contains(hm(7, 0)));
        assert!(window.contains(hm(19, 0)));
        assert!(window.contains(NaiveTime::from_hms_opt(19, 0, 59).unwrap()));
        assert!(window.contains(NaiveTime::from_hms_opt(7, 0, 0).unwrap()));
        assert!(!window.contains(hm(19, 1)));
        assert!(!window.contains(NaiveTime::from_hms_opt(6, 59, 59).unwrap()));
    }

    #[test]
    fn test_serializes_as_hh_mm() {
        let window = AttendanceWindow::new(hm(7, 0), hm(19, 30), 2);
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["start_time"], "07:00");
        assert_eq!(json["end_time"], "19:30");
    }

    #[test]
    fn test_negative_threshold_clamps() {
        let window = AttendanceWindow::new(hm(7, 0), hm(19, 0), -1);
        assert_eq!(window.min_visits(), 0);
    }
}
