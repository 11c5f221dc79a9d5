//! Scan records repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    engine::{Granularity, Pagination, Scope},
    error::AppResult,
    models::scan::{NewScan, ScanRecord},
};

const SCAN_COLUMNS: &str = "id, number, scan_date, scan_time, image_url";

#[derive(Clone)]
pub struct ScansRepository {
    pool: Pool<Postgres>,
}

impl ScansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every record between two dates (inclusive), in insertion order
    pub async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<ScanRecord>> {
        let query = format!(
            "SELECT {} FROM scan_records WHERE scan_date BETWEEN $1 AND $2 ORDER BY id",
            SCAN_COLUMNS
        );
        let rows = sqlx::query_as::<_, ScanRecord>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// One page of the scope, newest first, skipping excluded plates
    pub async fn page(
        &self,
        scope: &Scope,
        excluded: &[String],
        pagination: &Pagination,
    ) -> AppResult<Vec<ScanRecord>> {
        let order = match scope.granularity() {
            Granularity::Day => "scan_time DESC, id DESC",
            Granularity::Week | Granularity::Month => "scan_date DESC, scan_time DESC, id DESC",
        };
        let query = format!(
            r#"
            SELECT {} FROM scan_records
            WHERE scan_date BETWEEN $1 AND $2 AND NOT (number = ANY($3))
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            SCAN_COLUMNS, order
        );
        let rows = sqlx::query_as::<_, ScanRecord>(&query)
            .bind(scope.start())
            .bind(scope.end())
            .bind(excluded)
            .bind(i64::from(pagination.limit))
            .bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Records of one plate between two dates, in insertion order
    pub async fn for_car(
        &self,
        number: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ScanRecord>> {
        let query = format!(
            "SELECT {} FROM scan_records WHERE number = $1 AND scan_date BETWEEN $2 AND $3 ORDER BY id",
            SCAN_COLUMNS
        );
        let rows = sqlx::query_as::<_, ScanRecord>(&query)
            .bind(number)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert a scan
    pub async fn create(&self, scan: &NewScan) -> AppResult<ScanRecord> {
        let query = format!(
            r#"
            INSERT INTO scan_records (number, scan_date, scan_time, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SCAN_COLUMNS
        );
        let row = sqlx::query_as::<_, ScanRecord>(&query)
            .bind(&scan.number)
            .bind(scan.date)
            .bind(scan.time)
            .bind(&scan.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}
