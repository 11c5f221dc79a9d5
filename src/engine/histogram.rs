//! Histogram builder: hour-slot, day and weekday buckets
//!
//! Only observed buckets appear, in first-encountered order.

use std::hash::Hash;

use chrono::{NaiveDate, NaiveTime, Timelike};
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::scope::{Granularity, Scope};
use crate::models::ScanRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HourSlot {
    /// Rounded hour (HH:00)
    pub time: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DaySlot {
    pub day: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WeekdaySlot {
    /// Lowercase weekday name (monday..sunday)
    pub weekday: String,
    pub count: u32,
}

/// Chart data; the bucket kind follows the scope granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Graphic {
    Hourly(Vec<HourSlot>),
    Daily(Vec<DaySlot>),
    Weekly(Vec<WeekdaySlot>),
}

/// Nearest hour: :30 and later rounds up, 23:30 wraps to 00:00
pub fn round_time_slot(time: NaiveTime) -> String {
    let hour = if time.minute() >= 30 {
        (time.hour() + 1) % 24
    } else {
        time.hour()
    };
    format!("{:02}:00", hour)
}

fn tally<K: Hash + Eq>(keys: impl Iterator<Item = K>) -> IndexMap<K, u32> {
    let mut buckets = IndexMap::new();
    for key in keys {
        *buckets.entry(key).or_insert(0) += 1;
    }
    buckets
}

pub fn by_hour_slot(records: &[ScanRecord]) -> Vec<HourSlot> {
    tally(records.iter().map(|r| round_time_slot(r.time)))
        .into_iter()
        .map(|(time, count)| HourSlot { time, count })
        .collect()
}

pub fn by_day(records: &[ScanRecord]) -> Vec<DaySlot> {
    tally(records.iter().map(|r| r.date))
        .into_iter()
        .map(|(day, count)| DaySlot { day, count })
        .collect()
}

pub fn by_weekday(records: &[ScanRecord]) -> Vec<WeekdaySlot> {
    tally(records.iter().map(|r| r.date.format("%A").to_string().to_lowercase()))
        .into_iter()
        .map(|(weekday, count)| WeekdaySlot { weekday, count })
        .collect()
}

pub fn for_scope(scope: &Scope, records: &[ScanRecord]) -> Graphic {
    match scope.granularity() {
        Granularity::Day => Graphic::Hourly(by_hour_slot(records)),
        Granularity::Month => Graphic::Daily(by_day(records)),
        Granularity::Week => Graphic::Weekly(by_weekday(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{date, scan, time};

    #[test]
    fn test_round_time_slot() {
        assert_eq!(round_time_slot(time("14:29:59")), "14:00");
        assert_eq!(round_time_slot(time("14:30:00")), "15:00");
        assert_eq!(round_time_slot(time("14:31:00")), "15:00");
        assert_eq!(round_time_slot(time("23:30:00")), "00:00");
        assert_eq!(round_time_slot(time("23:45:00")), "00:00");
        assert_eq!(round_time_slot(time("00:00:00")), "00:00");
    }

    #[test]
    fn test_hour_slots_first_encountered_order() {
        let records = vec![
            scan(1, "A", "2024-01-01", "14:40:00"),
            scan(2, "B", "2024-01-01", "08:10:00"),
            scan(3, "C", "2024-01-01", "15:20:00"),
        ];
        let slots = by_hour_slot(&records);
        assert_eq!(
            slots,
            vec![
                HourSlot { time: "15:00".to_string(), count: 2 },
                HourSlot { time: "08:00".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_day_and_weekday_buckets() {
        let records = vec![
            scan(1, "A", "2024-01-02", "08:00:00"),
            scan(2, "A", "2024-01-01", "08:00:00"),
            scan(3, "B", "2024-01-02", "09:00:00"),
        ];
        assert_eq!(
            by_day(&records),
            vec![
                DaySlot { day: date("2024-01-02"), count: 2 },
                DaySlot { day: date("2024-01-01"), count: 1 },
            ]
        );
        let weekdays = by_weekday(&records);
        assert_eq!(weekdays[0].weekday, "tuesday");
        assert_eq!(weekdays[0].count, 2);
        assert_eq!(weekdays[1].weekday, "monday");
    }

    #[test]
    fn test_no_zero_buckets() {
        assert!(by_hour_slot(&[]).is_empty());
        let graphic = for_scope(&Scope::parse_week("2024-01").unwrap(), &[]);
        assert_eq!(graphic, Graphic::Weekly(vec![]));
    }
}
