//! Attendance window service

use crate::{
    error::{AppError, AppResult},
    models::attendance_window::{parse_hh_mm, AttendanceWindow, UpdateAttendanceWindow},
    repository::Repository,
};

#[derive(Clone)]
pub struct AttendanceWindowService {
    repository: Repository,
}

impl AttendanceWindowService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Current window; a missing row is a deployment problem
    pub async fn get(&self) -> AppResult<AttendanceWindow> {
        self.repository
            .attendance_window
            .get()
            .await?
            .ok_or_else(|| AppError::ConfigurationMissing("Attendance window is not configured".to_string()))
    }

    pub async fn update(&self, data: &UpdateAttendanceWindow) -> AppResult<AttendanceWindow> {
        let start_time = parse_hh_mm(&data.start_time).ok_or_else(|| {
            AppError::Validation(format!("Invalid start_time {:?}, expected HH:MM", data.start_time))
        })?;
        let end_time = parse_hh_mm(&data.end_time).ok_or_else(|| {
            AppError::Validation(format!("Invalid end_time {:?}, expected HH:MM", data.end_time))
        })?;
        if start_time >= end_time {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }
        if matches!(data.min_visits, Some(v) if v < 0) {
            return Err(AppError::Validation("min_visits must not be negative".to_string()));
        }

        let updated = self
            .repository
            .attendance_window
            .upsert(start_time, end_time, data.min_visits)
            .await?;
        tracing::info!(
            start = %updated.start_time,
            end = %updated.end_time,
            min_visits = updated.min_visits,
            "attendance window updated"
        );
        Ok(updated)
    }
}
