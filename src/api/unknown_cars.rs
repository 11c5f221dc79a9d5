//! Unknown car endpoints (scans whose plate could not be read)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;

use crate::{
    error::AppResult,
    models::{
        scan::{CreateUnknownScan, DateQuery},
        unknown_scan::{PurgeResult, UnknownScan},
    },
};

use super::{parse_day, read_image, AuthenticatedUser};

/// Unknown scans of one day
#[utoipa::path(
    get,
    path = "/unknown-cars",
    tag = "unknown_cars",
    params(DateQuery),
    responses(
        (status = 200, description = "Unknown scans, newest first", body = Vec<UnknownScan>),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_unknown_cars(
    State(state): State<crate::AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<UnknownScan>>> {
    let date = parse_day(&query.date)?;
    let scans = state.services.unknown_scans.list(date).await?;
    Ok(Json(scans))
}

/// Record an unreadable plate
#[utoipa::path(
    post,
    path = "/unknown-cars",
    tag = "unknown_cars",
    security(("bearer_auth" = [])),
    params(CreateUnknownScan),
    request_body(content = super::ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Unknown scan recorded", body = UnknownScan)
    )
)]
pub async fn create_unknown_car(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(data): Query<CreateUnknownScan>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UnknownScan>)> {
    let image = read_image(multipart).await?;
    let scan = state
        .services
        .unknown_scans
        .ingest(&data, &image.bytes, image.file_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(scan)))
}

/// Delete a day of unknown scans
#[utoipa::path(
    delete,
    path = "/unknown-cars",
    tag = "unknown_cars",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Day purged", body = PurgeResult)
    )
)]
pub async fn purge_unknown_cars(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<PurgeResult>> {
    claims.require_admin()?;

    let date = parse_day(&query.date)?;
    let purged = state.services.unknown_scans.purge(date).await?;
    Ok(Json(purged))
}
