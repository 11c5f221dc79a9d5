//! Exception numbers repository

use std::collections::HashSet;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::exception_number::ExceptionNumber,
};

#[derive(Clone)]
pub struct ExceptionNumbersRepository {
    pool: Pool<Postgres>,
}

impl ExceptionNumbersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List exception numbers
    pub async fn list(&self) -> AppResult<Vec<ExceptionNumber>> {
        let rows = sqlx::query_as::<_, ExceptionNumber>(
            "SELECT id, number, created_at FROM exception_numbers ORDER BY number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Plate numbers only, as a lookup set
    pub async fn numbers(&self) -> AppResult<HashSet<String>> {
        let numbers: Vec<String> = sqlx::query_scalar("SELECT number FROM exception_numbers")
            .fetch_all(&self.pool)
            .await?;
        Ok(numbers.into_iter().collect())
    }

    /// Add an exception number
    pub async fn create(&self, number: &str) -> AppResult<ExceptionNumber> {
        sqlx::query_as::<_, ExceptionNumber>(
            r#"
            INSERT INTO exception_numbers (number)
            VALUES ($1)
            ON CONFLICT (number) DO NOTHING
            RETURNING id, number, created_at
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Number {} is already excluded", number)))
    }

    /// Remove an exception number
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM exception_numbers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Exception number with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
