//! Frequency aggregator: per-plate visit counts and the ranked leaderboards

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ScanRecord;

/// Default leaderboard size
pub const TOP_N: usize = 10;

/// One distinct car: its representative scan plus its total visit count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedEntry {
    pub attend_id: i32,
    pub car_number: String,
    pub attend_date: NaiveDate,
    pub attend_time: NaiveTime,
    pub image_url: Option<String>,
    pub attend_count: u32,
}

impl RankedEntry {
    fn from_record(record: &ScanRecord, attend_count: u32) -> Self {
        Self {
            attend_id: record.id,
            car_number: record.number.clone(),
            attend_date: record.date,
            attend_time: record.time,
            image_url: record.image_url.clone(),
            attend_count,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frequency {
    /// Visits per plate, in first-seen order
    pub counts: IndexMap<String, u32>,
    pub unique_numbers: HashSet<String>,
    /// Input records, most frequent plates first; equal counts keep input order
    pub ranked_records: Vec<ScanRecord>,
    /// First `top_n` distinct plates of `all_distinct`
    pub top_n: Vec<RankedEntry>,
    /// Every distinct plate in ranked order
    pub all_distinct: Vec<RankedEntry>,
}

impl Frequency {
    pub fn total_cars(&self) -> usize {
        self.unique_numbers.len()
    }

    #[cfg(test)]
    pub fn count_of(&self, number: &str) -> u32 {
        self.counts.get(number).copied().unwrap_or(0)
    }
}

pub fn aggregate(records: &[ScanRecord]) -> Frequency {
    aggregate_with_limit(records, TOP_N)
}

/// The representative of a plate is the first of its records met in ranked
/// order, not necessarily its latest scan.
pub fn aggregate_with_limit(records: &[ScanRecord], top_n: usize) -> Frequency {
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    for record in records {
        *counts.entry(record.number.clone()).or_insert(0) += 1;
    }
    let unique_numbers: HashSet<String> = counts.keys().cloned().collect();

    let mut ranked_records = records.to_vec();
    // sort_by_key is stable
    ranked_records.sort_by_key(|record| Reverse(counts.get(&record.number).copied().unwrap_or(0)));

    let all_distinct: Vec<RankedEntry> = {
        let mut seen = HashSet::with_capacity(counts.len());
        ranked_records
            .iter()
            .filter(|record| seen.insert(record.number.as_str()))
            .map(|record| RankedEntry::from_record(record, counts[&record.number]))
            .collect()
    };
    let top_n = all_distinct.iter().take(top_n).cloned().collect();

    Frequency {
        counts,
        unique_numbers,
        ranked_records,
        top_n,
        all_distinct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{scan, time};

    fn sample() -> Vec<ScanRecord> {
        vec![
            scan(1, "B", "2024-01-01", "07:30:00"),
            scan(2, "A", "2024-01-01", "08:00:00"),
            scan(3, "C", "2024-01-01", "08:10:00"),
            scan(4, "A", "2024-01-01", "09:00:00"),
            scan(5, "B", "2024-01-01", "12:00:00"),
            scan(6, "A", "2024-01-01", "18:00:00"),
        ]
    }

    #[test]
    fn test_counts_sum_to_record_count() {
        let records = sample();
        let freq = aggregate(&records);
        assert_eq!(freq.counts.values().sum::<u32>() as usize, records.len());
        assert_eq!(freq.count_of("A"), 3);
        assert_eq!(freq.count_of("B"), 2);
        assert_eq!(freq.count_of("C"), 1);
        assert_eq!(freq.count_of("Z"), 0);
        assert_eq!(freq.total_cars(), 3);
    }

    #[test]
    fn test_ranking_is_stable() {
        let freq = aggregate(&sample());
        let ids: Vec<i32> = freq.ranked_records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 6, 1, 5, 3]);
    }

    #[test]
    fn test_representative_is_first_ranked_record() {
        let freq = aggregate(&sample());
        let a = &freq.all_distinct[0];
        assert_eq!(a.car_number, "A");
        assert_eq!(a.attend_id, 2);
        assert_eq!(a.attend_time, time("08:00:00"));
        assert_eq!(a.attend_count, 3);

        let numbers: Vec<&str> = freq.all_distinct.iter().map(|e| e.car_number.as_str()).collect();
        assert_eq!(numbers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_top_n_is_capped_prefix() {
        let records: Vec<ScanRecord> = (0..25)
            .map(|i| scan(i, &format!("CAR{:02}", i % 15), "2024-01-01", "10:00:00"))
            .collect();
        let freq = aggregate(&records);
        assert_eq!(freq.all_distinct.len(), 15);
        assert_eq!(freq.top_n.len(), TOP_N);
        assert_eq!(freq.top_n[..], freq.all_distinct[..TOP_N]);

        let small = aggregate_with_limit(&records, 3);
        assert_eq!(small.top_n.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let records = sample();
        let first = aggregate(&records);
        let second = aggregate(&records);
        assert_eq!(first.counts, second.counts);
        assert_eq!(first.unique_numbers, second.unique_numbers);
        assert_eq!(first.ranked_records, second.ranked_records);
        assert_eq!(first.all_distinct, second.all_distinct);
    }

    #[test]
    fn test_empty_input() {
        let freq = aggregate(&[]);
        assert!(freq.counts.is_empty());
        assert!(freq.unique_numbers.is_empty());
        assert!(freq.ranked_records.is_empty());
        assert!(freq.top_n.is_empty());
        assert!(freq.all_distinct.is_empty());
        assert_eq!(freq.total_cars(), 0);
    }
}
