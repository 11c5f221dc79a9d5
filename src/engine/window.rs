//! Window classifier: first and last sighting per car-day
//!
//! Ties on equal time resolve to the earliest-inserted record (smallest id),
//! for `first` as well as `last`, whatever order the records arrive in.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::error::{EngineError, EngineResult};
use super::scope::CarScope;
use crate::models::ScanRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstLast {
    pub first: ScanRecord,
    pub last: ScanRecord,
    pub visits: u32,
}

impl FirstLast {
    fn new(record: &ScanRecord) -> Self {
        Self {
            first: record.clone(),
            last: record.clone(),
            visits: 1,
        }
    }

    fn observe(&mut self, record: &ScanRecord) {
        self.visits += 1;
        if (record.time, record.id) < (self.first.time, self.first.id) {
            self.first = record.clone();
        }
        if record.time > self.last.time || (record.time == self.last.time && record.id < self.last.id) {
            self.last = record.clone();
        }
    }
}

/// Per date, ordered by date
pub fn first_last_per_day(records: &[ScanRecord]) -> BTreeMap<NaiveDate, FirstLast> {
    let mut days: BTreeMap<NaiveDate, FirstLast> = BTreeMap::new();
    for record in records {
        days.entry(record.date)
            .and_modify(|window| window.observe(record))
            .or_insert_with(|| FirstLast::new(record));
    }
    days
}

/// Per (date, plate), in first-seen order
pub fn first_last_per_car(records: &[ScanRecord]) -> IndexMap<(NaiveDate, String), FirstLast> {
    let mut cars: IndexMap<(NaiveDate, String), FirstLast> = IndexMap::new();
    for record in records {
        cars.entry((record.date, record.number.clone()))
            .and_modify(|window| window.observe(record))
            .or_insert_with(|| FirstLast::new(record));
    }
    cars
}

/// One day of a single car's month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CarDay {
    pub date: NaiveDate,
    pub car_number: String,
    pub first_time: NaiveTime,
    pub first_image: Option<String>,
    pub last_time: NaiveTime,
    pub last_image: Option<String>,
    /// Visits that day
    pub overall_count: u32,
}

/// First/last sighting of one car on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CarSnapshot {
    pub date: NaiveDate,
    pub car_number: String,
    pub first_time: NaiveTime,
    pub first_image: Option<String>,
    pub last_time: NaiveTime,
    pub last_image: Option<String>,
    pub attend_count: u32,
}

impl From<FirstLast> for CarSnapshot {
    fn from(window: FirstLast) -> Self {
        Self {
            date: window.first.date,
            car_number: window.first.number,
            first_time: window.first.time,
            first_image: window.first.image_url,
            last_time: window.last.time,
            last_image: window.last.image_url,
            attend_count: window.visits,
        }
    }
}

/// Per-day first/last for the scope's car, newest day first
pub fn car_days(records: &[ScanRecord], scope: &CarScope) -> EngineResult<Vec<CarDay>> {
    let number = scope.number.as_deref();
    let selected: Vec<ScanRecord> = records
        .iter()
        .filter(|r| number.map_or(true, |n| r.number == n) && scope.scope.contains(r.date))
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(EngineError::NotFound { scope: scope.to_string() });
    }

    Ok(first_last_per_day(&selected)
        .into_values()
        .rev()
        .map(|window| CarDay {
            date: window.first.date,
            car_number: window.first.number,
            first_time: window.first.time,
            first_image: window.first.image_url,
            last_time: window.last.time,
            last_image: window.last.image_url,
            overall_count: window.visits,
        })
        .collect())
}

/// Every car of the scope with its first/last sighting per day,
/// ordered by date then first sighting
pub fn cross_car(records: &[ScanRecord], scope: &CarScope) -> EngineResult<Vec<CarSnapshot>> {
    let selected: Vec<ScanRecord> = records
        .iter()
        .filter(|r| scope.scope.contains(r.date))
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(EngineError::NotFound { scope: scope.to_string() });
    }

    let mut snapshots: Vec<CarSnapshot> = first_last_per_car(&selected)
        .into_values()
        .map(CarSnapshot::from)
        .collect();
    snapshots.sort_by(|a, b| (a.date, a.first_time).cmp(&(b.date, b.first_time)));
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scope::Scope;
    use crate::engine::testing::{date, scan, time};

    fn car_scope(number: Option<&str>, value: &str) -> CarScope {
        CarScope::parse(number.map(str::to_string), value).unwrap()
    }

    #[test]
    fn test_first_last_scenario() {
        let records = vec![
            scan(1, "A", "2024-01-01", "08:00:00"),
            scan(2, "A", "2024-01-01", "09:00:00"),
            scan(3, "B", "2024-01-01", "10:00:00"),
        ];
        let cars = first_last_per_car(&records);
        let a = &cars[&(date("2024-01-01"), "A".to_string())];
        assert_eq!((a.first.time, a.last.time), (time("08:00:00"), time("09:00:00")));
        assert_eq!(a.visits, 2);
    }

    #[test]
    fn test_unordered_input() {
        let records = vec![
            scan(5, "A", "2024-01-01", "17:00:00"),
            scan(6, "A", "2024-01-01", "06:45:00"),
            scan(7, "A", "2024-01-01", "12:00:00"),
        ];
        let days = first_last_per_day(&records);
        let day = &days[&date("2024-01-01")];
        assert_eq!(day.first.id, 6);
        assert_eq!(day.last.id, 5);
    }

    #[test]
    fn test_equal_time_earliest_inserted_wins() {
        let forward = vec![
            scan(10, "A", "2024-01-01", "08:00:00"),
            scan(11, "A", "2024-01-01", "08:00:00"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        for records in [forward, backward] {
            let days = first_last_per_day(&records);
            let day = &days[&date("2024-01-01")];
            assert_eq!(day.first.id, 10);
            assert_eq!(day.last.id, 10);
        }
    }

    #[test]
    fn test_car_days_newest_first() {
        let records = vec![
            scan(1, "A", "2024-01-01", "08:00:00"),
            scan(2, "A", "2024-01-03", "09:00:00"),
            scan(3, "A", "2024-01-03", "18:00:00"),
            scan(4, "B", "2024-01-02", "10:00:00"),
        ];
        let days = car_days(&records, &car_scope(Some("A"), "2024-01")).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2024-01-03"));
        assert_eq!(days[0].overall_count, 2);
        assert_eq!(days[0].first_time, time("09:00:00"));
        assert_eq!(days[0].last_time, time("18:00:00"));
        assert_eq!(days[1].date, date("2024-01-01"));
    }

    #[test]
    fn test_empty_scope_is_not_found() {
        let records = vec![scan(1, "A", "2024-01-01", "08:00:00")];
        let err = car_days(&records, &car_scope(Some("B"), "2024-01")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let err = cross_car(&records, &car_scope(None, "2024-02-01")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_cross_car_per_day() {
        let records = vec![
            scan(1, "B", "2024-01-01", "10:00:00"),
            scan(2, "A", "2024-01-01", "08:00:00"),
            scan(3, "A", "2024-01-01", "15:00:00"),
            scan(4, "C", "2024-01-02", "07:00:00"),
        ];
        let scope = CarScope {
            number: None,
            scope: Scope::parse_date("2024-01-01").unwrap(),
        };
        let snapshots = cross_car(&records, &scope).unwrap();
        let numbers: Vec<&str> = snapshots.iter().map(|s| s.car_number.as_str()).collect();
        assert_eq!(numbers, vec!["A", "B"]);
        assert_eq!(snapshots[0].last_time, time("15:00:00"));
        assert_eq!(snapshots[0].attend_count, 2);
    }
}
