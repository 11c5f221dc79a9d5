//! Report policy: paid / non-paid classification
//!
//! Only the representative `attend_time` of an entry is checked against the
//! window, not every visit of the car.

use super::frequency::RankedEntry;
use crate::models::AttendanceWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub qualifying_top_n: Vec<RankedEntry>,
    pub qualifying_all: Vec<RankedEntry>,
    /// Distinct qualifying cars
    pub qualifying_count: usize,
    /// Sum of the qualifying cars' visits
    pub qualifying_total_visits: u32,
}

pub fn qualifies(entry: &RankedEntry, window: &AttendanceWindow, min_visits: u32) -> bool {
    entry.attend_count > min_visits && window.contains(entry.attend_time)
}

pub fn classify(
    top_n: &[RankedEntry],
    all_distinct: &[RankedEntry],
    window: &AttendanceWindow,
    min_visits: u32,
) -> Classification {
    let pick = |entries: &[RankedEntry]| -> Vec<RankedEntry> {
        entries
            .iter()
            .filter(|entry| qualifies(entry, window, min_visits))
            .cloned()
            .collect()
    };

    let qualifying_all = pick(all_distinct);
    Classification {
        qualifying_top_n: pick(top_n),
        qualifying_count: qualifying_all.len(),
        qualifying_total_visits: qualifying_all.iter().map(|entry| entry.attend_count).sum(),
        qualifying_all,
    }
}
