//! Unknown scans repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{scan::NewScan, unknown_scan::UnknownScan},
};

#[derive(Clone)]
pub struct UnknownScansRepository {
    pool: Pool<Postgres>,
}

impl UnknownScansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List the unknown scans of a day, newest first
    pub async fn list(&self, date: NaiveDate) -> AppResult<Vec<UnknownScan>> {
        let rows = sqlx::query_as::<_, UnknownScan>(
            "SELECT * FROM unknown_scans WHERE scan_date = $1 ORDER BY scan_time DESC, id DESC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, scan: &NewScan) -> AppResult<UnknownScan> {
        let row = sqlx::query_as::<_, UnknownScan>(
            r#"
            INSERT INTO unknown_scans (number, scan_date, scan_time, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&scan.number)
        .bind(scan.date)
        .bind(scan.time)
        .bind(&scan.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete every unknown scan of a day
    pub async fn purge(&self, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM unknown_scans WHERE scan_date = $1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
