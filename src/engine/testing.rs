//! Fixtures shared by the engine tests

use chrono::{NaiveDate, NaiveTime};

use crate::models::ScanRecord;

pub fn scan(id: i32, number: &str, date: &str, time: &str) -> ScanRecord {
    ScanRecord {
        id,
        number: number.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        image_url: Some(format!("/storage/{}.jpg", id)),
    }
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M:%S").unwrap()
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
