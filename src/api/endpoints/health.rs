//! Health check endpoint.

use axum::extract::State;
use serde::Serialize;

use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::profile;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub profile_exists: bool,
}

/// `GET /api/health`: liveness check.
pub async fn check(State(ctx): State<ApiContext>) -> ApiResult<HealthResponse> {
    let profile_exists = {
        let conn = ctx.core.lock_db()?;
        profile::get_profile(&conn)?.is_some()
    };

    Ok(ApiResponse::ok(
        "Service is healthy",
        HealthResponse {
            status: "ok",
            version: crate::config::APP_VERSION,
            profile_exists,
        },
    ))
}
