//! Daily reports API endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        daily_report::{DailyReport, DailyReportLookup},
        scan::DateQuery,
    },
    services::export::XLSX_CONTENT_TYPE,
};

use super::{parse_day, AuthenticatedUser};

/// Stored report of a day, or every stored report of a month
#[utoipa::path(
    get,
    path = "/daily-reports",
    tag = "daily_reports",
    params(DateQuery),
    responses(
        (status = 200, description = "Report (day, null when missing) or reports (month)", body = DailyReportLookup),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_daily_reports(
    State(state): State<crate::AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DailyReportLookup>> {
    let lookup = state.services.reports.lookup(&query.date).await?;
    Ok(Json(lookup))
}

/// Generate the report of a past day that has none
#[utoipa::path(
    post,
    path = "/daily-reports/generate",
    tag = "daily_reports",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 201, description = "Report generated", body = DailyReport),
        (status = 409, description = "Report already exists", body = crate::error::ErrorResponse),
        (status = 503, description = "Attendance window not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_daily_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DateQuery>,
) -> AppResult<(StatusCode, Json<DailyReport>)> {
    claims.require_admin()?;

    let date = parse_day(&query.date)?;
    let report = state.services.reports.generate(date).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Download a daily sheet (day) or the monthly summary (month) as xlsx
#[utoipa::path(
    get,
    path = "/daily-reports/export",
    tag = "daily_reports",
    params(DateQuery),
    responses(
        (status = 200, description = "Spreadsheet", body = String, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "No report for that day", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_daily_reports(
    State(state): State<crate::AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Response> {
    let sheet = state.services.reports.export(&query.date).await?;
    Ok(attachment(sheet.file_name, sheet.bytes))
}

/// xlsx download response
pub(crate) fn attachment(file_name: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
