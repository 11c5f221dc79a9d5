//! Unknown scans service (plates the camera could not read)

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        scan::{parse_date, parse_time, CreateUnknownScan, NewScan},
        unknown_scan::{PurgeResult, UnknownScan},
    },
    repository::Repository,
};

use super::storage::ImageStorage;

#[derive(Clone)]
pub struct UnknownScansService {
    repository: Repository,
    storage: ImageStorage,
    public_base_url: String,
}

impl UnknownScansService {
    pub fn new(repository: Repository, storage: ImageStorage, public_base_url: String) -> Self {
        Self {
            repository,
            storage,
            public_base_url,
        }
    }

    fn publish(&self, mut scan: UnknownScan) -> UnknownScan {
        scan.image_url = scan
            .image_url
            .map(|path| format!("{}{}", self.public_base_url, path));
        scan
    }

    /// Unknown scans of one day
    pub async fn list(&self, date: NaiveDate) -> AppResult<Vec<UnknownScan>> {
        let scans = self.repository.unknown_scans.list(date).await?;
        Ok(scans.into_iter().map(|scan| self.publish(scan)).collect())
    }

    pub async fn ingest(
        &self,
        data: &CreateUnknownScan,
        image: &[u8],
        file_name: Option<&str>,
    ) -> AppResult<UnknownScan> {
        data.validate()?;
        let (date, time) = parse_date(&data.date)
            .zip(parse_time(&data.time))
            .ok_or_else(|| AppError::Validation("Invalid date or time".to_string()))?;

        let image_url = self.storage.save(image, file_name).await?;
        let created = self
            .repository
            .unknown_scans
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

        tracing::info!(date = %scan.date, time = %scan.time, "unknown scan recorded");
        Ok(self.publish(scan))
    }

    /// Delete a day of unknown scans. Image files are left on disk.
    pub async fn purge(&self, date: NaiveDate) -> AppResult<PurgeResult> {
        let deleted = self.repository.unknown_scans.purge(date).await?;
        tracing::info!(%date, deleted, "unknown scans purged");
        Ok(PurgeResult { date, deleted })
    }
}
