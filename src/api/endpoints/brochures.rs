//! Aftercare checklist endpoints.
//!
//! - `GET /api/brochures/myomectomy`: corpus merged with progress
//! - `GET /api/brochures/sections/:section_id`: one merged section
//! - `GET /api/brochures/progress`: persisted item records
//! - `POST /api/brochures/progress`: upsert one item
//! - `POST /api/brochures/sections/:section_id/toggle`: invert a section
//! - `PUT /api/brochures/sections/:section_id/notes`: section notes
//! - `DELETE /api/brochures/progress/reset`: clear everything

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::brochure;
use crate::models::{BrochureSection, ItemProgress, ProgressUpdate};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrochureResponse {
    pub id: &'static str,
    pub sections: Vec<BrochureSection>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

#[derive(Debug, Deserialize)]
pub struct SectionNotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// `GET /api/brochures/myomectomy`
pub async fn myomectomy(State(ctx): State<ApiContext>) -> ApiResult<BrochureResponse> {
    let sections = {
        let conn = ctx.core.lock_db()?;
        brochure::load_merged(&conn, ctx.core.corpus())?
    };
    let counts = brochure::count_items(&sections);

    Ok(ApiResponse::ok(
        "Brochure retrieved",
        BrochureResponse {
            id: brochure::DEFAULT_BROCHURE_ID,
            sections,
            completed_tasks: counts.completed,
            total_tasks: counts.total,
        },
    ))
}

/// `GET /api/brochures/sections/:section_id`
pub async fn section(
    State(ctx): State<ApiContext>,
    Path(section_id): Path<String>,
) -> ApiResult<BrochureSection> {
    let sections = {
        let conn = ctx.core.lock_db()?;
        brochure::load_merged(&conn, ctx.core.corpus())?
    };
    let section = brochure::find_section(&sections, &section_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Section not found: {section_id}")))?;

    Ok(ApiResponse::ok("Section retrieved", section))
}

/// `GET /api/brochures/progress`
pub async fn list_progress(State(ctx): State<ApiContext>) -> ApiResult<Vec<ItemProgress>> {
    let conn = ctx.core.lock_db()?;
    let progress = brochure::list_progress(&conn)?;
    Ok(ApiResponse::ok("Progress retrieved", progress))
}

/// `POST /api/brochures/progress`
pub async fn update_progress(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ProgressUpdate>, JsonRejection>,
) -> ApiResult<ItemProgress> {
    let Json(update) = payload?;

    let conn = ctx.core.lock_db()?;
    let record = brochure::upsert_item_progress(&conn, ctx.core.corpus(), &update, Utc::now())?;
    Ok(ApiResponse::ok("Progress updated", record))
}

/// `POST /api/brochures/sections/:section_id/toggle`
pub async fn toggle_section(
    State(ctx): State<ApiContext>,
    Path(section_id): Path<String>,
) -> ApiResult<BrochureSection> {
    let conn = ctx.core.lock_db()?;
    let section = brochure::toggle_section(&conn, ctx.core.corpus(), &section_id, Utc::now())?;
    Ok(ApiResponse::ok("Section toggled", section))
}

/// `PUT /api/brochures/sections/:section_id/notes`
pub async fn section_notes(
    State(ctx): State<ApiContext>,
    Path(section_id): Path<String>,
    payload: Result<Json<SectionNotesRequest>, JsonRejection>,
) -> ApiResult<BrochureSection> {
    let Json(request) = payload?;

    let sections = {
        let conn = ctx.core.lock_db()?;
        brochure::set_section_notes(
            &conn,
            ctx.core.corpus(),
            &section_id,
            request.notes,
            Utc::now(),
        )?;
        brochure::load_merged(&conn, ctx.core.corpus())?
    };
    let section = brochure::find_section(&sections, &section_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Section not found: {section_id}")))?;

    Ok(ApiResponse::ok("Section notes saved", section))
}

/// `DELETE /api/brochures/progress/reset`
pub async fn reset(State(ctx): State<ApiContext>) -> ApiResult<()> {
    let conn = ctx.core.lock_db()?;
    brochure::reset_progress(&conn)?;
    Ok(ApiResponse::ok("Progress reset", ()))
}
