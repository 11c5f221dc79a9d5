//! Attendance window API endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::attendance_window::{AttendanceWindow, UpdateAttendanceWindow},
};

use super::AuthenticatedUser;

/// Get the attendance window
#[utoipa::path(
    get,
    path = "/attendance-window",
    tag = "attendance_window",
    responses(
        (status = 200, description = "Current window", body = AttendanceWindow),
        (status = 503, description = "Window not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_attendance_window(
    State(state): State<crate::AppState>,
) -> AppResult<Json<AttendanceWindow>> {
    let window = state.services.attendance_window.get().await?;
    Ok(Json(window))
}

/// Update the attendance window
#[utoipa::path(
    put,
    path = "/attendance-window",
    tag = "attendance_window",
    security(("bearer_auth" = [])),
    request_body = UpdateAttendanceWindow,
    responses(
        (status = 200, description = "Window updated", body = AttendanceWindow),
        (status = 400, description = "Invalid times", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_attendance_window(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<UpdateAttendanceWindow>,
) -> AppResult<Json<AttendanceWindow>> {
    claims.require_admin()?;

    let window = state.services.attendance_window.update(&data).await?;
    Ok(Json(window))
}
