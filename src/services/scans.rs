//! Scan ingestion service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::scan::{parse_date, parse_time, CreateScan, NewScan, ScanRecord},
    repository::Repository,
};

use super::storage::ImageStorage;

#[derive(Clone)]
pub struct ScansService {
    repository: Repository,
    storage: ImageStorage,
    public_base_url: String,
}

impl ScansService {
    pub fn new(repository: Repository, storage: ImageStorage, public_base_url: String) -> Self {
        Self {
            repository,
            storage,
            public_base_url,
        }
    }

    /// Validate, store the image, then record the scan
    pub async fn ingest(
        &self,
        data: &CreateScan,
        image: &[u8],
        file_name: Option<&str>,
    ) -> AppResult<ScanRecord> {
        data.validate()?;
        let (date, time) = parse_date(&data.date)
            .zip(parse_time(&data.time))
            .ok_or_else(|| AppError::Validation("Invalid date or time".to_string()))?;

        let image_url = self.storage.save(image, file_name).await?;
        let created = self
            .repository
            .scans
            .create(&NewScan {
                number: data.number.clone(),
                date,
                time,
                image_url: image_url.clone(),
            })
            .await;
        let scan = match created {
            Ok(scan) => scan,
            Err(err) => {
                // the row is missing, so the image would be orphaned
                self.storage.remove(&image_url).await;
                return Err(err);
            }
        };

        tracing::info!(number = %scan.number, date = %scan.date, time = %scan.time, "scan recorded");
        Ok(scan.published(&self.public_base_url))
    }
}
