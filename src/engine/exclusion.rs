//! Exclusion filter: drops records whose plate is on the exception list

use std::collections::HashSet;

use crate::models::ScanRecord;

/// Order-preserving removal of excluded plates. An empty set leaves the input untouched.
pub fn filter(records: Vec<ScanRecord>, excluded: &HashSet<String>) -> Vec<ScanRecord> {
    if excluded.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| !excluded.contains(&record.number))
        .collect()
}
