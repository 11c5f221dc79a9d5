//! Daily reports: generation, lookup and the derived sheets

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::{
    engine::{
        frequency::RankedEntry,
        summary::{self, DailySheet, MonthlySummary},
        Granularity, Orchestrator, Scope,
    },
    error::{AppError, AppResult},
    models::daily_report::{DailyReport, DailyReportLookup},
    repository::{RecordStore, ReportStore},
};

use super::export;

/// An exported workbook
pub struct Spreadsheet {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportsService {
    records: Arc<dyn RecordStore>,
    reports: Arc<dyn ReportStore>,
    orchestrator: Orchestrator,
    public_base_url: String,
    offset: FixedOffset,
}

impl ReportsService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        reports: Arc<dyn ReportStore>,
        orchestrator: Orchestrator,
        public_base_url: String,
        offset: FixedOffset,
    ) -> Self {
        Self {
            records,
            reports,
            orchestrator,
            public_base_url,
            offset,
        }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    fn publish(&self, mut report: DailyReport) -> DailyReport {
        let base = &self.public_base_url;
        let prefix = |entries: &mut Vec<RankedEntry>| {
            for entry in entries.iter_mut() {
                entry.image_url = entry.image_url.take().map(|path| format!("{}{}", base, path));
            }
        };
        prefix(&mut report.top10.0);
        prefix(&mut report.general.0);
        report
    }

    /// Classify a finished day and store the result.
    ///
    /// Stored reports are immutable: a day that already has one yields
    /// `Conflict`. Today and future days are rejected.
    pub async fn generate(&self, date: NaiveDate) -> AppResult<DailyReport> {
        if date >= self.today() {
            return Err(AppError::BadRequest(format!(
                "Cannot generate a report for {} before the day is over",
                date
            )));
        }
        if self.reports.report(date).await?.is_some() {
            return Err(AppError::Conflict(format!("Daily report for {} already exists", date)));
        }

        let scope = Scope::day(date);
        let (records, excluded, window) = tokio::try_join!(
            self.records.scans_in_scope(scope),
            self.records.exception_numbers(),
            self.records.attendance_window(),
        )?;

        let draft = self
            .orchestrator
            .daily_report(date, records, excluded, window)
            .await?;
        let report = self.reports.insert_report(draft).await?;

        tracing::info!(
            %date,
            paid = report.general_count,
            overall = report.overall_count,
            "daily report generated"
        );
        Ok(self.publish(report))
    }

    /// One day's report, or every stored report of a month
    pub async fn lookup(&self, date: &str) -> AppResult<DailyReportLookup> {
        let scope = Scope::parse_date(date)?;
        match scope.granularity() {
            Granularity::Day => {
                let report = self.reports.report(scope.start()).await?;
                Ok(DailyReportLookup::Day(report.map(|r| self.publish(r))))
            }
            Granularity::Week | Granularity::Month => {
                let reports = self.reports.reports_between(scope.start(), scope.end()).await?;
                Ok(DailyReportLookup::Month(
                    reports.into_iter().map(|r| self.publish(r)).collect(),
                ))
            }
        }
    }

    /// Paid cars of a stored report with their first/last sighting
    pub async fn daily_sheet(&self, date: NaiveDate) -> AppResult<DailySheet> {
        let report = self
            .reports
            .report(date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No daily report for {}", date)))?;
        let records = self.records.scans_in_scope(Scope::day(date)).await?;
        let sheet = self
            .orchestrator
            .daily_sheet(date, report.general.0, records)
            .await?;
        Ok(sheet)
    }

    /// Monthly summary over the stored reports of the month containing `date`
    pub async fn monthly_summary(&self, scope: Scope) -> AppResult<MonthlySummary> {
        let reports = self.reports.reports_between(scope.start(), scope.end()).await?;
        Ok(summary::monthly_summary(&reports))
    }

    /// `YYYY-MM-DD` exports the daily sheet, `YYYY-MM` the monthly summary
    pub async fn export(&self, date: &str) -> AppResult<Spreadsheet> {
        let scope = Scope::parse_date(date)?;
        match scope.granularity() {
            Granularity::Day => {
                let sheet = self.daily_sheet(scope.start()).await?;
                Ok(Spreadsheet {
                    file_name: format!("daily-{}.xlsx", scope.start().format("%Y-%m-%d")),
                    bytes: export::daily_sheet(&sheet)?,
                })
            }
            Granularity::Week | Granularity::Month => {
                let summary = self.monthly_summary(scope).await?;
                Ok(Spreadsheet {
                    file_name: format!("monthly-{}.xlsx", scope.start().format("%Y-%m")),
                    bytes: export::monthly_summary(&summary)?,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    use chrono::NaiveTime;
    use mockall::predicate::eq;
    use sqlx::types::Json;
    use tokio_test::{assert_err, assert_ok};

    use crate::engine::frequency;
    use crate::models::{AttendanceWindow, ScanRecord};
    use crate::repository::store::{MockRecordStore, MockReportStore};

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn record(id: i32, number: &str, time: &str) -> ScanRecord {
        ScanRecord {
            id,
            number: number.to_string(),
            date: day("2024-01-01"),
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            image_url: Some(format!("/storage/{}.jpg", id)),
        }
    }

    fn records() -> Vec<ScanRecord> {
        vec![
            record(1, "A", "08:00:00"),
            record(2, "A", "09:00:00"),
            record(3, "A", "12:00:00"),
            record(4, "B", "10:00:00"),
        ]
    }

    fn window() -> AttendanceWindow {
        AttendanceWindow::new(
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            2,
        )
    }

    fn stored(draft: summary::DailyReportDraft) -> DailyReport {
        DailyReport {
            id: 1,
            date: draft.date,
            top10: Json(draft.top10),
            general: Json(draft.general),
            general_count: draft.general_count as i32,
            general_attendances_count: draft.general_attendances_count as i32,
            overall_count: draft.overall_count as i32,
            created_at: None,
        }
    }

    fn service(records: MockRecordStore, reports: MockReportStore) -> ReportsService {
        ReportsService::new(
            Arc::new(records),
            Arc::new(reports),
            Orchestrator::new(Duration::from_secs(5), frequency::TOP_N),
            "http://cdn.test".to_string(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_generate_stores_classification() {
        let mut store = MockRecordStore::new();
        store.expect_scans_in_scope().returning(|_| Ok(records()));
        store.expect_exception_numbers().returning(|| Ok(HashSet::new()));
        store.expect_attendance_window().returning(|| Ok(Some(window())));

        let mut reports = MockReportStore::new();
        reports
            .expect_report()
            .with(eq(day("2024-01-01")))
            .returning(|_| Ok(None));
        reports
            .expect_insert_report()
            .withf(|draft| draft.general_count == 1 && draft.overall_count == 2)
            .times(1)
            .returning(|draft| Ok(stored(draft)));

        let report = assert_ok!(service(store, reports).generate(day("2024-01-01")).await);
        assert_eq!(report.general_attendances_count, 3);
        assert_eq!(
            report.general[0].image_url.as_deref(),
            Some("http://cdn.test/storage/1.jpg")
        );
    }

    #[tokio::test]
    async fn test_generate_refuses_existing_report() {
        let records = MockRecordStore::new();
        let mut reports = MockReportStore::new();
        reports.expect_report().returning(|date| {
            Ok(Some(DailyReport {
                id: 1,
                date,
                top10: Json(vec![]),
                general: Json(vec![]),
                general_count: 0,
                general_attendances_count: 0,
                overall_count: 0,
                created_at: None,
            }))
        });
        reports.expect_insert_report().never();

        let result = service(records, reports).generate(day("2024-01-01")).await;
        assert!(matches!(assert_err!(result), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_generate_without_window() {
        let mut store = MockRecordStore::new();
        store.expect_scans_in_scope().returning(|_| Ok(records()));
        store.expect_exception_numbers().returning(|| Ok(HashSet::new()));
        store.expect_attendance_window().returning(|| Ok(None));
        let mut reports = MockReportStore::new();
        reports.expect_report().returning(|_| Ok(None));

        let result = service(store, reports).generate(day("2024-01-01")).await;
        assert!(matches!(assert_err!(result), AppError::ConfigurationMissing(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_future_day() {
        let result = service(MockRecordStore::new(), MockReportStore::new())
            .generate(day("2999-01-01"))
            .await;
        assert!(matches!(assert_err!(result), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_daily_sheet_requires_report() {
        let mut reports = MockReportStore::new();
        reports.expect_report().returning(|_| Ok(None));
        let result = service(MockRecordStore::new(), reports)
            .daily_sheet(day("2024-01-01"))
            .await;
        assert!(matches!(assert_err!(result), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_month_lists_reports() {
        let mut reports = MockReportStore::new();
        reports
            .expect_reports_between()
            .with(eq(day("2024-02-01")), eq(day("2024-02-29")))
            .returning(|_, _| Ok(Vec::new()));
        let lookup = assert_ok!(service(MockRecordStore::new(), reports).lookup("2024-02").await);
        assert!(matches!(lookup, DailyReportLookup::Month(list) if list.is_empty()));
    }

    #[tokio::test]
    async fn test_export_month_workbook() {
        let mut reports = MockReportStore::new();
        reports.expect_reports_between().returning(|_, _| Ok(Vec::new()));
        let sheet = assert_ok!(service(MockRecordStore::new(), reports).export("2024-01").await);
        assert_eq!(sheet.file_name, "monthly-2024-01.xlsx");
        assert!(sheet.bytes.starts_with(b"PK"));
    }
}
