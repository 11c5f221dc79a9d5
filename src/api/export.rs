//! Generic spreadsheet export endpoint

use axum::{response::Response, Json};
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    services::export,
};

use super::daily_reports::attachment;

/// Convert a JSON array of objects into an xlsx file
#[utoipa::path(
    post,
    path = "/export",
    tag = "export",
    request_body(content = Vec<serde_json::Value>, description = "Rows; the first object's keys become the header"),
    responses(
        (status = 200, description = "Spreadsheet", body = String, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Empty input", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_rows(Json(rows): Json<Vec<Map<String, Value>>>) -> AppResult<Response> {
    let bytes = tokio::task::spawn_blocking(move || export::json_rows(&rows))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(attachment("export.xlsx".to_string(), bytes))
}
