//! Car scan endpoints: ingestion and attendance views

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;

use crate::{
    engine::{AttendanceEnvelope, CarView, Pagination},
    error::AppResult,
    models::scan::{CarQuery, CreateScan, DayQuery, MonthQuery, ScanRecord, WeekQuery},
};

use super::{read_image, AuthenticatedUser};

/// Record one plate scan
#[utoipa::path(
    post,
    path = "/cars",
    tag = "cars",
    security(("bearer_auth" = [])),
    params(CreateScan),
    request_body(content = super::ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Scan recorded", body = ScanRecord),
        (status = 400, description = "Invalid number, date, time or image", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_scan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(data): Query<CreateScan>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ScanRecord>)> {
    let image = read_image(multipart).await?;
    tracing::debug!(operator = %claims.sub, number = %data.number, "scan upload");

    let scan = state
        .services
        .scans
        .ingest(&data, &image.bytes, image.file_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(scan)))
}

/// Attendance of one day
#[utoipa::path(
    get,
    path = "/cars/day",
    tag = "cars",
    params(DayQuery),
    responses(
        (status = 200, description = "Day attendance", body = AttendanceEnvelope),
        (status = 400, description = "Invalid day or pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn day_attendance(
    State(state): State<crate::AppState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<AttendanceEnvelope>> {
    let pagination = Pagination::new(query.page, query.limit)?;
    let envelope = state
        .services
        .attendance
        .day(query.day.as_deref(), pagination)
        .await?;
    Ok(Json(envelope))
}

/// Attendance of one ISO week
#[utoipa::path(
    get,
    path = "/cars/week",
    tag = "cars",
    params(WeekQuery),
    responses(
        (status = 200, description = "Week attendance", body = AttendanceEnvelope),
        (status = 400, description = "Invalid week or pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn week_attendance(
    State(state): State<crate::AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<AttendanceEnvelope>> {
    let pagination = Pagination::new(query.page, query.limit)?;
    let envelope = state
        .services
        .attendance
        .week(query.week.as_deref(), pagination)
        .await?;
    Ok(Json(envelope))
}

/// Attendance of one month
#[utoipa::path(
    get,
    path = "/cars/month",
    tag = "cars",
    params(MonthQuery),
    responses(
        (status = 200, description = "Month attendance", body = AttendanceEnvelope),
        (status = 400, description = "Invalid month or pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn month_attendance(
    State(state): State<crate::AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<AttendanceEnvelope>> {
    let pagination = Pagination::new(query.page, query.limit)?;
    let envelope = state
        .services
        .attendance
        .month(query.month.as_deref(), pagination)
        .await?;
    Ok(Json(envelope))
}

/// First and last sighting of every car on a day or month
#[utoipa::path(
    get,
    path = "/cars/snapshot",
    tag = "cars",
    params(CarQuery),
    responses(
        (status = 200, description = "First/last per car", body = CarView),
        (status = 404, description = "No scans in scope", body = crate::error::ErrorResponse)
    )
)]
pub async fn snapshot(
    State(state): State<crate::AppState>,
    Query(query): Query<CarQuery>,
) -> AppResult<Json<CarView>> {
    let pagination = Pagination::new(query.page, query.limit)?;
    let view = state
        .services
        .attendance
        .car_view(None, &query.date, Some(pagination))
        .await?;
    Ok(Json(view))
}

/// Scans of one car on a day, or its daily first/last over a month
#[utoipa::path(
    get,
    path = "/cars/{car_number}",
    tag = "cars",
    params(
        ("car_number" = String, Path, description = "Plate number"),
        CarQuery
    ),
    responses(
        (status = 200, description = "Car view", body = CarView),
        (status = 400, description = "Invalid date or pagination", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not seen in scope", body = crate::error::ErrorResponse)
    )
)]
pub async fn car_view(
    State(state): State<crate::AppState>,
    Path(car_number): Path<String>,
    Query(query): Query<CarQuery>,
) -> AppResult<Json<CarView>> {
    let pagination = Pagination::new(query.page, query.limit)?;
    let view = state
        .services
        .attendance
        .car_view(Some(car_number), &query.date, Some(pagination))
        .await?;
    Ok(Json(view))
}
