//! Attendance views: day, week, month and single-car aggregates

use std::sync::Arc;
use std::time::Instant;

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::{
    engine::{
        AttendanceEnvelope, CarScope, CarView, Granularity, Orchestrator, Pagination, Scope,
        ScopeSnapshot,
    },
    error::{AppError, AppResult},
    models::ScanRecord,
    repository::RecordStore,
};

#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn RecordStore>,
    orchestrator: Orchestrator,
    public_base_url: String,
    offset: FixedOffset,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        orchestrator: Orchestrator,
        public_base_url: String,
        offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            orchestrator,
            public_base_url,
            offset,
        }
    }

    /// Current date in market time
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    fn publish(&self, records: Vec<ScanRecord>) -> Vec<ScanRecord> {
        records
            .into_iter()
            .map(|record| record.published(&self.public_base_url))
            .collect()
    }

    /// Day view, today when no day is given
    pub async fn day(&self, day: Option<&str>, pagination: Pagination) -> AppResult<AttendanceEnvelope> {
        let scope = match day {
            Some(value) => expect_granularity(Scope::parse_date(value)?, Granularity::Day, value)?,
            None => Scope::day(self.today()),
        };
        self.scope_view(scope, pagination).await
    }

    /// ISO week view, current week when none is given
    pub async fn week(&self, week: Option<&str>, pagination: Pagination) -> AppResult<AttendanceEnvelope> {
        let scope = match week {
            Some(value) => Scope::parse_week(value)?,
            None => Scope::week_of(self.today())?,
        };
        self.scope_view(scope, pagination).await
    }

    /// Month view, current month when none is given
    pub async fn month(&self, month: Option<&str>, pagination: Pagination) -> AppResult<AttendanceEnvelope> {
        let scope = match month {
            Some(value) => expect_granularity(Scope::parse_date(value)?, Granularity::Month, value)?,
            None => Scope::month_of(self.today())?,
        };
        self.scope_view(scope, pagination).await
    }

    /// Load the scope (full set and requested page) and aggregate it
    pub async fn scope_view(&self, scope: Scope, pagination: Pagination) -> AppResult<AttendanceEnvelope> {
        let started = Instant::now();
        let excluded = self.store.exception_numbers().await?;
        let excluded_list: Vec<String> = excluded.iter().cloned().collect();

        let (records, page) = tokio::try_join!(
            self.store.scans_in_scope(scope),
            self.store.scans_page(scope, excluded_list, pagination),
        )?;
        let query_duration = started.elapsed();

        tracing::debug!(
            %scope,
            records = records.len(),
            page = page.len(),
            query_ms = query_duration.as_millis() as u64,
            "scope loaded"
        );

        let snapshot = ScopeSnapshot {
            scope,
            records: self.publish(records),
            page: self.publish(page),
            excluded,
            query_duration,
        };
        Ok(self.orchestrator.attendance(snapshot).await?)
    }

    /// Single car on a day or month; without a number, every car's first/last
    pub async fn car_view(
        &self,
        number: Option<String>,
        date: &str,
        pagination: Option<Pagination>,
    ) -> AppResult<CarView> {
        let car_scope = CarScope::parse(number, date)?;
        let excluded = self.store.exception_numbers().await?;
        let records = match &car_scope.number {
            Some(number) => {
                self.store
                    .car_scans(number.clone(), car_scope.scope.start(), car_scope.scope.end())
                    .await?
            }
            None => self.store.scans_in_scope(car_scope.scope).await?,
        };

        let view = self
            .orchestrator
            .car_view(car_scope, self.publish(records), excluded, pagination)
            .await?;
        Ok(view)
    }
}

fn expect_granularity(scope: Scope, granularity: Granularity, raw: &str) -> AppResult<Scope> {
    if scope.granularity() == granularity {
        Ok(scope)
    } else {
        let expected = match granularity {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Week => "YYYY-WW",
            Granularity::Month => "YYYY-MM",
        };
        Err(AppError::BadRequest(format!(
            "Invalid value {:?}, expected {}",
            raw, expected
        )))
    }
}
