use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::OffsetDateTime;

use casetrack_auth::AuthContext;
use casetrack_core::{CoreError, CreateCaseRequest, MeResponse};

use crate::error::ApiError;
use crate::server::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// GET /me - the caller's identity as the server resolved it.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(MeResponse {
        oid: ctx.object_id().map(str::to_string),
        username: ctx.username().map(str::to_string),
        roles: ctx.roles.clone(),
    })
}

/// GET /cases - all cases, newest first.
pub async fn list_cases(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.cases.get_all().await)
}

/// GET /cases/{id}
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let case = state
        .cases
        .get(&id)
        .await
        .ok_or_else(|| ApiError(CoreError::not_found("Case", &id)))?;
    Ok(Json(case).into_response())
}

/// POST /cases
pub async fn create_case(
    State(state): State<AppState>,
    Json(request): Json<CreateCaseRequest>,
) -> Result<Response, ApiError> {
    let case = request.into_case(OffsetDateTime::now_utc())?;
    let created = state.cases.upsert(case).await;

    tracing::info!(id = %created.id, "Case created");
    let location = format!("/cases/{}", created.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)).into_response())
}

/// DELETE /cases/{id}
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if !state.cases.delete(&id).await {
        return Err(ApiError(CoreError::not_found("Case", &id)));
    }
    tracing::info!(id = %id, "Case deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /audit - retained audit events, newest first.
pub async fn get_audit(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.audit.get_all().await)
}
