//! Profile endpoints.
//!
//! - `GET /api/profile`
//! - `PUT /api/profile`: names + email
//! - `PATCH /api/profile/surgery-date`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::models::{ProfileUpdate, SurgeryDateUpdate, UserProfile};
use crate::profile;

/// `GET /api/profile`
pub async fn get(State(ctx): State<ApiContext>) -> ApiResult<UserProfile> {
    let conn = ctx.core.lock_db()?;
    let profile = profile::get_profile(&conn)?.ok_or(ApiError::NoProfile)?;
    Ok(ApiResponse::ok("Profile retrieved", profile))
}

/// `PUT /api/profile`
pub async fn save(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(update) = payload?;
    let conn = ctx.core.lock_db()?;
    let profile = profile::save_profile(&conn, &update, Utc::now())?;
    Ok(ApiResponse::ok("Profile saved", profile))
}

/// `PATCH /api/profile/surgery-date`
pub async fn surgery_date(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SurgeryDateUpdate>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(update) = payload?;
    let conn = ctx.core.lock_db()?;
    let profile = profile::update_surgery_date(&conn, &update.surgery_date, Utc::now())?;
    Ok(ApiResponse::ok("Surgery date updated", profile))
}
