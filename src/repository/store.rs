//! Read/write seams used by the aggregation services

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::Repository;
use crate::{
    engine::{summary::DailyReportDraft, Pagination, Scope},
    error::AppResult,
    models::{AttendanceWindow, DailyReport, ScanRecord},
};

/// Source of scan records and the configuration that shapes their aggregation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of the scope
    async fn scans_in_scope(&self, scope: Scope) -> AppResult<Vec<ScanRecord>>;

    /// One page of the scope, newest first, excluded plates removed
    async fn scans_page(
        &self,
        scope: Scope,
        excluded: Vec<String>,
        pagination: Pagination,
    ) -> AppResult<Vec<ScanRecord>>;

    /// Records of one plate between two dates
    async fn car_scans(&self, number: String, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<ScanRecord>>;

    async fn exception_numbers(&self) -> AppResult<HashSet<String>>;

    async fn attendance_window(&self) -> AppResult<Option<AttendanceWindow>>;
}

/// Persisted daily reports
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn report(&self, date: NaiveDate) -> AppResult<Option<DailyReport>>;

    async fn reports_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyReport>>;

    async fn insert_report(&self, draft: DailyReportDraft) -> AppResult<DailyReport>;
}

#[async_trait]
impl RecordStore for Repository {
    async fn scans_in_scope(&self, scope: Scope) -> AppResult<Vec<ScanRecord>> {
        self.scans.in_range(scope.start(), scope.end()).await
    }

    async fn scans_page(
        &self,
        scope: Scope,
        excluded: Vec<String>,
        pagination: Pagination,
    ) -> AppResult<Vec<ScanRecord>> {
        self.scans.page(&scope, &excluded, &pagination).await
    }

    async fn car_scans(&self, number: String, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<ScanRecord>> {
        self.scans.for_car(&number, start, end).await
    }

    async fn exception_numbers(&self) -> AppResult<HashSet<String>> {
        self.exception_numbers.numbers().await
    }

    async fn attendance_window(&self) -> AppResult<Option<AttendanceWindow>> {
        self.attendance_window.get().await
    }
}

#[async_trait]
impl ReportStore for Repository {
    async fn report(&self, date: NaiveDate) -> AppResult<Option<DailyReport>> {
        self.daily_reports.get(date).await
    }

    async fn reports_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyReport>> {
        self.daily_reports.in_range(start, end).await
    }

    async fn insert_report(&self, draft: DailyReportDraft) -> AppResult<DailyReport> {
        self.daily_reports.insert(&draft).await
    }
}
