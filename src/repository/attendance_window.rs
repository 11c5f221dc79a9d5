//! Attendance window repository (singleton row)

use chrono::NaiveTime;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::attendance_window::AttendanceWindow};

#[derive(Clone)]
pub struct AttendanceWindowRepository {
    pool: Pool<Postgres>,
}

impl AttendanceWindowRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> AppResult<Option<AttendanceWindow>> {
        let row = sqlx::query_as::<_, AttendanceWindow>(
            "SELECT start_time, end_time, min_visits, modif_date FROM attendance_window WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update in place, creating the row when it is missing
    pub async fn upsert(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
        min_visits: Option<i32>,
    ) -> AppResult<AttendanceWindow> {
        let row = sqlx::query_as::<_, AttendanceWindow>(
            r#"
            INSERT INTO attendance_window (id, start_time, end_time, min_visits, modif_date)
            VALUES (1, $1, $2, COALESCE($3, 2), NOW())
            ON CONFLICT (id) DO UPDATE SET
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                min_visits = COALESCE($3, attendance_window.min_visits),
                modif_date = NOW()
            RETURNING start_time, end_time, min_visits, modif_date
            "#,
        )
        .bind(start_time)
        .bind(end_time)
        .bind(min_visits)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
