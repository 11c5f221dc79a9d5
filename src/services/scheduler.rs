//! Daily report scheduler
//!
//! Once a day, at `run_at` market time, the report of the day that just
//! ended is generated. Days that already have a report are skipped.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tokio::task::JoinHandle;

use crate::error::AppError;

use super::reports::ReportsService;

pub struct ReportScheduler {
    reports: ReportsService,
    run_at: NaiveTime,
    offset: FixedOffset,
}

/// Next instant, strictly after `now`, at which the local clock reads `run_at`
pub fn next_run(now: DateTime<Utc>, run_at: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local_now = now.with_timezone(&offset).naive_local();
    let today_run = local_now.date().and_time(run_at);
    let local_run = if today_run > local_now {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };
    local_to_utc(local_run, offset)
}

fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let naive_utc = local - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&naive_utc)
}

/// The day a run at `at` reports on: the local day before the run
pub fn report_date(at: DateTime<Utc>, offset: FixedOffset) -> Option<NaiveDate> {
    at.with_timezone(&offset)
        .date_naive()
        .checked_sub_days(Days::new(1))
}

impl ReportScheduler {
    pub fn new(reports: ReportsService, run_at: NaiveTime, offset: FixedOffset) -> Self {
        Self {
            reports,
            run_at,
            offset,
        }
    }

    /// Run forever on the runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        tracing::info!(run_at = %self.run_at, offset = %self.offset, "report scheduler started");
        loop {
            let now = Utc::now();
            let at = next_run(now, self.run_at, self.offset);
            let wait = (at - now).to_std().unwrap_or_default();
            tracing::debug!(next_run = %at, "report scheduler sleeping");
            tokio::time::sleep(wait).await;

            match report_date(at, self.offset) {
                Some(date) => self.run_once(date).await,
                None => tracing::error!(%at, "cannot compute report date"),
            }
        }
    }

    /// Generate one day's report, logging the outcome
    pub async fn run_once(&self, date: NaiveDate) {
        match self.reports.generate(date).await {
            Ok(report) => tracing::info!(
                %date,
                paid = report.general_count,
                overall = report.overall_count,
                "scheduled daily report stored"
            ),
            Err(AppError::Conflict(_)) => {
                tracing::info!(%date, "daily report already present, skipping")
            }
            Err(err) => tracing::error!(%date, error = %err, "scheduled daily report failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn plus5() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn run_at() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 23, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        // 23:00 local on Jan 1st
        let now = utc("2024-01-01T18:00:00Z");
        assert_eq!(next_run(now, run_at(), plus5()), utc("2024-01-01T19:23:00Z"));
    }

    #[test]
    fn test_next_run_after_todays_run() {
        // 00:23 local exactly: the next run is tomorrow
        let now = utc("2024-01-01T19:23:00Z");
        assert_eq!(next_run(now, run_at(), plus5()), utc("2024-01-02T19:23:00Z"));
    }

    #[test]
    fn test_report_date_is_previous_local_day() {
        let at = utc("2024-01-01T19:23:00Z");
        assert_eq!(report_date(at, plus5()), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_negative_offset() {
        let minus3 = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = utc("2024-03-10T02:00:00Z");
        let at = next_run(now, run_at(), minus3);
        assert_eq!(at, utc("2024-03-10T03:23:00Z"));
        assert_eq!(report_date(at, minus3), NaiveDate::from_ymd_opt(2024, 3, 9));
    }
}
