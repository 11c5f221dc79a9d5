//! Orchestrator: runs the aggregation passes for one request and assembles
//! the response.
//!
//! Independent passes run as blocking jobs over one shared snapshot and are
//! joined before assembly. The whole batch is bounded by a timeout.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use super::error::{EngineError, EngineResult};
use super::frequency::{self, RankedEntry};
use super::histogram::{self, Graphic};
use super::scope::{CarScope, Granularity, Pagination, Scope};
use super::summary::{self, DailyReportDraft, DailySheet};
use super::{exclusion, window};
use crate::models::{AttendanceWindow, ScanRecord};

/// One scan as listed in the paginated part of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Attendance {
    pub attend_id: i32,
    pub car_number: String,
    pub attend_date: NaiveDate,
    pub attend_time: NaiveTime,
    pub image_url: Option<String>,
}

impl From<ScanRecord> for Attendance {
    fn from(record: ScanRecord) -> Self {
        Self {
            attend_id: record.id,
            car_number: record.number,
            attend_date: record.date,
            attend_time: record.time,
            image_url: record.image_url,
        }
    }
}

/// Durations in milliseconds
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Timing {
    pub query_duration: f64,
    pub calculation_duration: f64,
    /// Per aggregation pass
    #[schema(value_type = Object)]
    pub phases: IndexMap<String, f64>,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Day / week / month response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceEnvelope {
    /// Requested page of scans, newest first
    pub general: Vec<Attendance>,
    /// Scans in scope (after exclusion)
    pub general_count: usize,
    pub top10: Vec<RankedEntry>,
    /// Distinct cars in scope
    pub total_cars: usize,
    pub graphic: Graphic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_cars: Option<Vec<RankedEntry>>,
    pub timing: Timing,
}

/// One scan of a single car's day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CarShot {
    pub time: NaiveTime,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CarDayScans {
    pub cars: Vec<CarShot>,
    /// Scans of the car that day
    pub overall_count: usize,
}

/// Single-car response; the shape follows the scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CarView {
    /// Car + month: one entry per day
    Month(Vec<window::CarDay>),
    /// Car + day: the day's scans
    Day(CarDayScans),
    /// No car: first/last per car
    Snapshot(Vec<window::CarSnapshot>),
}

/// Records of one scope as returned by the store
#[derive(Debug, Clone)]
pub struct ScopeSnapshot {
    pub scope: Scope,
    /// Every record in scope
    pub records: Vec<ScanRecord>,
    /// The requested page, newest first
    pub page: Vec<ScanRecord>,
    pub excluded: HashSet<String>,
    pub query_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    budget: Duration,
    top_n: usize,
}

fn spawn_phase<T, F>(job: F) -> JoinHandle<(T, Duration)>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let output = job();
        (output, started.elapsed())
    })
}

impl Orchestrator {
    pub fn new(budget: Duration, top_n: usize) -> Self {
        Self { budget, top_n }
    }

    /// Bound a batch by the budget
    async fn bounded<T>(
        &self,
        scope: String,
        batch: impl Future<Output = Result<T, tokio::task::JoinError>>,
    ) -> EngineResult<T> {
        match tokio::time::timeout(self.budget, batch).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(join_error)) => Err(EngineError::Worker {
                scope,
                reason: join_error.to_string(),
            }),
            Err(_) => Err(EngineError::Timeout {
                scope,
                secs: self.budget.as_secs(),
            }),
        }
    }

    /// Day, week or month view
    pub async fn attendance(&self, snapshot: ScopeSnapshot) -> EngineResult<AttendanceEnvelope> {
        let started = Instant::now();
        let ScopeSnapshot {
            scope,
            records,
            page,
            excluded,
            query_duration,
        } = snapshot;

        let records: Arc<[ScanRecord]> = exclusion::filter(records, &excluded).into();
        let page = exclusion::filter(page, &excluded);

        let frequency_job = {
            let records = Arc::clone(&records);
            let top_n = self.top_n;
            spawn_phase(move || frequency::aggregate_with_limit(&records, top_n))
        };
        let histogram_job = {
            let records = Arc::clone(&records);
            spawn_phase(move || histogram::for_scope(&scope, &records))
        };

        let ((freq, frequency_took), (graphic, histogram_took)) = self
            .bounded(scope.to_string(), async { tokio::try_join!(frequency_job, histogram_job) })
            .await
            .map_err(|err| {
                tracing::warn!(%scope, error = %err, "attendance aggregation failed");
                err
            })?;

        let mut general: Vec<ScanRecord> = page;
        match scope.granularity() {
            Granularity::Day => general.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id))),
            Granularity::Week | Granularity::Month => general.sort_by(|a, b| {
                (b.date, b.time).cmp(&(a.date, a.time)).then(b.id.cmp(&a.id))
            }),
        }

        let mut phases = IndexMap::new();
        phases.insert("frequency".to_string(), millis(frequency_took));
        phases.insert("histogram".to_string(), millis(histogram_took));

        tracing::debug!(
            %scope,
            records = records.len(),
            cars = freq.total_cars(),
            "attendance aggregated"
        );

        Ok(AttendanceEnvelope {
            general: general.into_iter().map(Attendance::from).collect(),
            general_count: records.len(),
            total_cars: freq.total_cars(),
            top10: freq.top_n,
            graphic,
            all_cars: Some(freq.all_distinct),
            timing: Timing {
                query_duration: millis(query_duration),
                calculation_duration: millis(started.elapsed()),
                phases,
            },
        })
    }

    /// Single-car (or all-cars snapshot) view
    pub async fn car_view(
        &self,
        scope: CarScope,
        records: Vec<ScanRecord>,
        excluded: HashSet<String>,
        pagination: Option<Pagination>,
    ) -> EngineResult<CarView> {
        let label = scope.to_string();
        let job = tokio::task::spawn_blocking(move || {
            let records = exclusion::filter(records, &excluded);
            car_view_of(&scope, records, pagination)
        });
        let view = self.bounded(label.clone(), job).await?;
        view.map_err(|err| {
            tracing::debug!(scope = %label, error = %err, "car view failed");
            err
        })
    }

    /// Classify one day for the persisted report. The window is required.
    pub async fn daily_report(
        &self,
        date: NaiveDate,
        records: Vec<ScanRecord>,
        excluded: HashSet<String>,
        attendance_window: Option<AttendanceWindow>,
    ) -> EngineResult<DailyReportDraft> {
        let scope = Scope::day(date).to_string();
        let attendance_window =
            attendance_window.ok_or_else(|| EngineError::ConfigurationMissing { scope: scope.clone() })?;
        let top_n = self.top_n;
        let job = tokio::task::spawn_blocking(move || {
            summary::daily_report(date, records, &excluded, &attendance_window, top_n)
        });
        self.bounded(scope, job).await
    }

    /// Paid cars of a stored report joined with the day's first/last sightings
    pub async fn daily_sheet(
        &self,
        date: NaiveDate,
        general: Vec<RankedEntry>,
        records: Vec<ScanRecord>,
    ) -> EngineResult<DailySheet> {
        let job = tokio::task::spawn_blocking(move || summary::daily_sheet(date, &general, &records));
        self.bounded(Scope::day(date).to_string(), job).await
    }
}

fn car_view_of(
    scope: &CarScope,
    records: Vec<ScanRecord>,
    pagination: Option<Pagination>,
) -> EngineResult<CarView> {
    let page_of = |len: usize| pagination.unwrap_or(Pagination { page: 1, limit: u32::try_from(len).unwrap_or(u32::MAX).max(1) });

    match (&scope.number, scope.scope.granularity()) {
        (Some(_), Granularity::Month) => {
            let days = window::car_days(&records, scope)?;
            let page = page_of(days.len());
            Ok(CarView::Month(page.slice(&days).to_vec()))
        }
        (Some(number), Granularity::Day) => {
            let mut scans: Vec<ScanRecord> = records
                .into_iter()
                .filter(|r| &r.number == number && scope.scope.contains(r.date))
                .collect();
            if scans.is_empty() {
                return Err(EngineError::NotFound { scope: scope.to_string() });
            }
            scans.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id)));
            let page = page_of(scans.len());
            Ok(CarView::Day(CarDayScans {
                overall_count: scans.len(),
                cars: page
                    .slice(&scans)
                    .iter()
                    .map(|r| CarShot {
                        time: r.time,
                        image: r.image_url.clone(),
                    })
                    .collect(),
            }))
        }
        (None, Granularity::Day | Granularity::Month) => {
            let snapshots = window::cross_car(&records, scope)?;
            let page = page_of(snapshots.len());
            Ok(CarView::Snapshot(page.slice(&snapshots).to_vec()))
        }
        (_, Granularity::Week) => Err(EngineError::InvalidRequest(format!(
            "{} is not supported for car views, use a day or a month",
            scope.scope
        ))),
    }
}
