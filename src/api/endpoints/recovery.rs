//! Recovery progress endpoints.
//!
//! - `GET /api/recovery/progress`: dashboard summary
//! - `GET /api/recovery/phase?days=N`: phase label and color

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::types::{ApiContext, ApiResponse, ApiResult};
use crate::dashboard::{self, DashboardData};
use crate::recovery::{recovery_week, RecoveryPhase};

#[derive(Debug, Deserialize)]
pub struct PhaseQuery {
    pub days: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResponse {
    pub days_since_surgery: i64,
    pub phase: RecoveryPhase,
    pub color: &'static str,
    pub recovery_week: u8,
}

/// `GET /api/recovery/progress`
pub async fn progress(State(ctx): State<ApiContext>) -> ApiResult<DashboardData> {
    let conn = ctx.core.lock_db()?;
    let data = dashboard::build_dashboard(&conn, ctx.core.corpus(), Utc::now())?;
    Ok(ApiResponse::ok("Recovery progress calculated", data))
}

/// `GET /api/recovery/phase?days=N`
pub async fn phase(query: Result<Query<PhaseQuery>, QueryRejection>) -> ApiResult<PhaseResponse> {
    let Query(PhaseQuery { days }) = query?;
    let phase = RecoveryPhase::from_days(days);
    Ok(ApiResponse::ok(
        "Recovery phase resolved",
        PhaseResponse {
            days_since_surgery: days,
            phase,
            color: phase.color(),
            recovery_week: recovery_week(days),
        },
    ))
}
