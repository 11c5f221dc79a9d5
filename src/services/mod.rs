//! Business logic services

pub mod attendance;
pub mod attendance_window;
pub mod exception_numbers;
pub mod export;
pub mod reports;
pub mod scans;
pub mod scheduler;
pub mod storage;
pub mod unknown_scans;

use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::AppConfig,
    engine::Orchestrator,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub attendance: attendance::AttendanceService,
    pub scans: scans::ScansService,
    pub unknown_scans: unknown_scans::UnknownScansService,
    pub exception_numbers: exception_numbers::ExceptionNumbersService,
    pub attendance_window: attendance_window::AttendanceWindowService,
    pub reports: reports::ReportsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let offset = config
            .reports
            .offset()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let orchestrator = Orchestrator::new(
            Duration::from_secs(config.engine.timeout_secs),
            config.engine.top_n,
        );
        let storage = storage::ImageStorage::new(&config.storage.dir);
        let base_url = config.storage.public_base_url.trim_end_matches('/').to_string();
        let store = Arc::new(repository.clone());

        Ok(Self {
            attendance: attendance::AttendanceService::new(
                store.clone(),
                orchestrator.clone(),
                base_url.clone(),
                offset,
            ),
            scans: scans::ScansService::new(repository.clone(), storage.clone(), base_url.clone()),
            unknown_scans: unknown_scans::UnknownScansService::new(
                repository.clone(),
                storage,
                base_url.clone(),
            ),
            exception_numbers: exception_numbers::ExceptionNumbersService::new(repository.clone()),
            attendance_window: attendance_window::AttendanceWindowService::new(repository.clone()),
            reports: reports::ReportsService::new(store.clone(), store, orchestrator, base_url, offset),
            repository,
        })
    }

    /// Database round-trip for readiness checks
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }

    /// Scheduler for the daily report, when enabled
    pub fn report_scheduler(&self, config: &AppConfig) -> AppResult<Option<scheduler::ReportScheduler>> {
        if !config.reports.enabled {
            return Ok(None);
        }
        let run_at = config
            .reports
            .run_at_time()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let offset = config
            .reports
            .offset()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Some(scheduler::ReportScheduler::new(
            self.reports.clone(),
            run_at,
            offset,
        )))
    }
}
