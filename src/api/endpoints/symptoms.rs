//! Symptom log endpoints.
//!
//! - `GET /api/symptoms`: history, most recent first
//! - `POST /api/symptoms`: record an entry
//! - `PUT /api/symptoms/:id`: partial update
//! - `DELETE /api/symptoms/:id`: delete one
//! - `DELETE /api/symptoms/clear`: delete all

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::journal;
use crate::models::{SymptomEntry, SymptomEntryRequest, SymptomUpdate};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub deleted: usize,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid symptom id: {id}")))
}

/// `GET /api/symptoms`
pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Vec<SymptomEntry>> {
    let conn = ctx.core.lock_db()?;
    let symptoms = journal::list_symptoms(&conn)?;
    Ok(ApiResponse::ok("Symptoms retrieved", symptoms))
}

/// `POST /api/symptoms`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SymptomEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SymptomEntry>>), ApiError> {
    let Json(request) = payload?;
    let conn = ctx.core.lock_db()?;
    let entry = journal::record_symptom(&conn, &request, Utc::now())?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Symptom recorded", entry)))
}

/// `PUT /api/symptoms/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<SymptomUpdate>, JsonRejection>,
) -> ApiResult<SymptomEntry> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    let conn = ctx.core.lock_db()?;
    let entry = journal::update_symptom(&conn, &id, &update, Utc::now())?;
    Ok(ApiResponse::ok("Symptom updated", entry))
}

/// `DELETE /api/symptoms/:id`
pub async fn delete(State(ctx): State<ApiContext>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    journal::delete_symptom(&conn, &id)?;
    Ok(ApiResponse::ok("Symptom deleted", ()))
}

/// `DELETE /api/symptoms/clear`
pub async fn clear(State(ctx): State<ApiContext>) -> ApiResult<ClearResponse> {
    let conn = ctx.core.lock_db()?;
    let deleted = journal::clear_symptoms(&conn)?;
    Ok(ApiResponse::ok("Symptoms cleared", ClearResponse { deleted }))
}
