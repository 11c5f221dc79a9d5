//! Exception numbers service

use validator::Validate;

use crate::{
    error::AppResult,
    models::exception_number::{CreateExceptionNumber, ExceptionNumber},
    repository::Repository,
};

#[derive(Clone)]
pub struct ExceptionNumbersService {
    repository: Repository,
}

impl ExceptionNumbersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List exception numbers
    pub async fn list(&self) -> AppResult<Vec<ExceptionNumber>> {
        self.repository.exception_numbers.list().await
    }

    /// Exclude a plate from every aggregate
    pub async fn create(&self, data: &CreateExceptionNumber) -> AppResult<ExceptionNumber> {
        data.validate()?;
        let number = data.number.trim();
        let created = self.repository.exception_numbers.create(number).await?;
        tracing::info!(number = %created.number, "exception number added");
        Ok(created)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.exception_numbers.delete(id).await?;
        tracing::info!(id, "exception number removed");
        Ok(())
    }
}
