//! Repository layer for database operations

pub mod attendance_window;
pub mod daily_reports;
pub mod exception_numbers;
pub mod scans;
pub mod store;
pub mod unknown_scans;

use sqlx::{Pool, Postgres};

pub use store::{RecordStore, ReportStore};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub scans: scans::ScansRepository,
    pub unknown_scans: unknown_scans::UnknownScansRepository,
    pub exception_numbers: exception_numbers::ExceptionNumbersRepository,
    pub attendance_window: attendance_window::AttendanceWindowRepository,
    pub daily_reports: daily_reports::DailyReportsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            scans: scans::ScansRepository::new(pool.clone()),
            unknown_scans: unknown_scans::UnknownScansRepository::new(pool.clone()),
            exception_numbers: exception_numbers::ExceptionNumbersRepository::new(pool.clone()),
            attendance_window: attendance_window::AttendanceWindowRepository::new(pool.clone()),
            daily_reports: daily_reports::DailyReportsRepository::new(pool.clone()),
            pool,
        }
    }
}
