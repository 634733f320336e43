//! Export endpoint.

use axum::extract::State;
use chrono::Utc;

use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::export::{self, RecoveryReport};

/// `GET /api/export`: all recovery data as report sheets.
pub async fn report(State(ctx): State<ApiContext>) -> ApiResult<RecoveryReport> {
    let conn = ctx.core.lock_db()?;
    let report = export::build_report(&conn, ctx.core.corpus(), Utc::now())?;
    Ok(ApiResponse::ok("Export generated", report))
}
