//! Daily reports repository

use chrono::NaiveDate;
use sqlx::{types::Json, Pool, Postgres};

use crate::{
    engine::summary::DailyReportDraft,
    error::{AppError, AppResult},
    models::daily_report::DailyReport,
};

#[derive(Clone)]
pub struct DailyReportsRepository {
    pool: Pool<Postgres>,
}

impl DailyReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get(&self, date: NaiveDate) -> AppResult<Option<DailyReport>> {
        let row = sqlx::query_as::<_, DailyReport>("SELECT * FROM daily_reports WHERE report_date = $1")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Reports between two dates, newest first
    pub async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DailyReport>> {
        let rows = sqlx::query_as::<_, DailyReport>(
            "SELECT * FROM daily_reports WHERE report_date BETWEEN $1 AND $2 ORDER BY report_date DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Store a report; an existing report for the same day is never replaced
    pub async fn insert(&self, draft: &DailyReportDraft) -> AppResult<DailyReport> {
        let to_i32 = |value: u32| i32::try_from(value).unwrap_or(i32::MAX);
        sqlx::query_as::<_, DailyReport>(
            r#"
            INSERT INTO daily_reports (
                report_date, top10, general, general_count,
                general_attendances_count, overall_count
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (report_date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(draft.date)
        .bind(Json(&draft.top10))
        .bind(Json(&draft.general))
        .bind(to_i32(draft.general_count))
        .bind(to_i32(draft.general_attendances_count))
        .bind(to_i32(draft.overall_count))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Daily report for {} already exists", draft.date)))
    }
}
