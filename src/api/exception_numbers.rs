//! Exception numbers API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::exception_number::{CreateExceptionNumber, ExceptionNumber},
};

use super::AuthenticatedUser;

/// List exception numbers
#[utoipa::path(
    get,
    path = "/exception-numbers",
    tag = "exception_numbers",
    responses(
        (status = 200, description = "Excluded plates", body = Vec<ExceptionNumber>)
    )
)]
pub async fn list_exception_numbers(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<ExceptionNumber>>> {
    let numbers = state.services.exception_numbers.list().await?;
    Ok(Json(numbers))
}

/// Exclude a plate from attendance accounting
#[utoipa::path(
    post,
    path = "/exception-numbers",
    tag = "exception_numbers",
    security(("bearer_auth" = [])),
    request_body = CreateExceptionNumber,
    responses(
        (status = 201, description = "Exception number created", body = ExceptionNumber),
        (status = 409, description = "Number already excluded", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_exception_number(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateExceptionNumber>,
) -> AppResult<(StatusCode, Json<ExceptionNumber>)> {
    claims.require_admin()?;

    let number = state.services.exception_numbers.create(&data).await?;
    Ok((StatusCode::CREATED, Json(number)))
}

/// Remove an exception number
#[utoipa::path(
    delete,
    path = "/exception-numbers/{id}",
    tag = "exception_numbers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Exception number ID")),
    responses(
        (status = 204, description = "Exception number deleted"),
        (status = 404, description = "Unknown ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_exception_number(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.exception_numbers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
