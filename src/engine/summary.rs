//! Daily and monthly report figures

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use super::frequency::{self, RankedEntry};
use super::{exclusion, policy, window};
use crate::models::{AttendanceWindow, DailyReport, ScanRecord};

/// Report figures for one day, before persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReportDraft {
    pub date: NaiveDate,
    pub top10: Vec<RankedEntry>,
    pub general: Vec<RankedEntry>,
    pub general_count: u32,
    pub general_attendances_count: u32,
    pub overall_count: u32,
}

/// Classify one day's records. Records of other days are ignored.
pub fn daily_report(
    date: NaiveDate,
    records: Vec<ScanRecord>,
    excluded: &HashSet<String>,
    attendance_window: &AttendanceWindow,
    top_n: usize,
) -> DailyReportDraft {
    let records: Vec<ScanRecord> = exclusion::filter(records, excluded)
        .into_iter()
        .filter(|record| record.date == date)
        .collect();
    let freq = frequency::aggregate_with_limit(&records, top_n);
    let classified = policy::classify(
        &freq.top_n,
        &freq.all_distinct,
        attendance_window,
        attendance_window.min_visits(),
    );

    let general_count = u32::try_from(classified.qualifying_count).unwrap_or(u32::MAX);
    let overall_count = u32::try_from(freq.total_cars()).unwrap_or(u32::MAX);
    debug_assert!(general_count <= overall_count);

    DailyReportDraft {
        date,
        top10: classified.qualifying_top_n,
        general: classified.qualifying_all,
        general_count,
        general_attendances_count: classified.qualifying_total_visits,
        overall_count,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailySheetRow {
    pub car_number: String,
    pub attend_count: u32,
    pub first_time: NaiveTime,
    pub last_time: NaiveTime,
}

/// Paid cars of one day with their first and last sighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailySheet {
    pub date: NaiveDate,
    pub rows: Vec<DailySheetRow>,
    pub total_cars: u32,
    pub total_attendance: u32,
}

/// Join the report's qualifying cars with the day's first/last sightings.
/// Cars without a sighting that day are left out.
pub fn daily_sheet(date: NaiveDate, general: &[RankedEntry], records: &[ScanRecord]) -> DailySheet {
    let day: Vec<ScanRecord> = records.iter().filter(|r| r.date == date).cloned().collect();
    let windows = window::first_last_per_car(&day);

    let rows: Vec<DailySheetRow> = general
        .iter()
        .filter_map(|entry| {
            windows
                .get(&(date, entry.car_number.clone()))
                .map(|seen| DailySheetRow {
                    car_number: entry.car_number.clone(),
                    attend_count: entry.attend_count,
                    first_time: seen.first.time,
                    last_time: seen.last.time,
                })
        })
        .collect();

    DailySheet {
        date,
        total_cars: u32::try_from(rows.len()).unwrap_or(u32::MAX),
        total_attendance: rows.iter().map(|row| row.attend_count).sum(),
        rows,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyRow {
    pub date: NaiveDate,
    /// Visits of the paid cars
    pub daily_count: u32,
    /// daily_count / paid_car, 0 without paid cars
    pub average_come: f64,
    pub paid_car: u32,
    pub non_paid_car: u32,
    pub general_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MonthlyTotal {
    pub daily_count: u32,
    pub average_come: f64,
    pub paid_car: u32,
    pub non_paid_car: u32,
    pub general_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySummary {
    pub rows: Vec<MonthlyRow>,
    pub total: MonthlyTotal,
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// One row per stored report, in the given order, plus a total row
pub fn monthly_summary(reports: &[DailyReport]) -> MonthlySummary {
    let rows: Vec<MonthlyRow> = reports
        .iter()
        .map(|report| {
            let paid_car = non_negative(report.general_count);
            let daily_count: u32 = report.general.iter().map(|car| car.attend_count).sum();
            MonthlyRow {
                date: report.date,
                daily_count,
                average_come: ratio(daily_count, paid_car),
                paid_car,
                non_paid_car: non_negative(report.overall_count.saturating_sub(report.general_count)),
                general_count: non_negative(report.general_attendances_count),
            }
        })
        .collect();

    let mut total = rows.iter().fold(MonthlyTotal::default(), |mut acc, row| {
        acc.daily_count += row.daily_count;
        acc.paid_car += row.paid_car;
        acc.non_paid_car += row.non_paid_car;
        acc.general_count += row.general_count;
        acc
    });
    total.average_come = ratio(total.daily_count, total.paid_car);

    MonthlySummary { rows, total }
}
