//! Dashboard summary: recovery score, phase badge, checklist counts and
//! the latest symptom entries.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::brochure::{count_items, load_merged};
use crate::db::DatabaseError;
use crate::journal::{list_symptoms, recent_symptoms};
use crate::models::{BrochureSection, SymptomEntry};
use crate::profile::get_profile;
use crate::recovery::{
    calculate_recovery_progress_at, recovery_week, surgery_instant, RecoveryPhase, RecoveryProgress,
    DEFAULT_PHASE_COLOR,
};

pub const RECENT_SYMPTOM_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// No surgery date recorded yet, so nothing can be scored.
    pub is_new_user: bool,
    pub progress: Option<RecoveryProgress>,
    pub phase: Option<RecoveryPhase>,
    pub phase_color: String,
    pub recovery_week: u8,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub recent_symptoms: Vec<SymptomEntry>,
}

pub fn build_dashboard(
    conn: &Connection,
    corpus: &[BrochureSection],
    now: DateTime<Utc>,
) -> Result<DashboardData, DatabaseError> {
    let sections = load_merged(conn, corpus)?;
    let tasks = count_items(&sections);
    let recent = recent_symptoms(conn, RECENT_SYMPTOM_LIMIT)?;
    let surgery_date = get_profile(conn)?.and_then(|p| p.surgery_date);

    let Some(surgery_date) = surgery_date else {
        return Ok(DashboardData {
            is_new_user: true,
            progress: None,
            phase: None,
            phase_color: DEFAULT_PHASE_COLOR.to_string(),
            recovery_week: 0,
            completed_tasks: tasks.completed,
            total_tasks: tasks.total,
            recent_symptoms: recent,
        });
    };

    let history = list_symptoms(conn)?;
    let progress =
        calculate_recovery_progress_at(surgery_instant(surgery_date), &sections, &history, now);
    let phase = progress.phase();
    let days = progress.factors.days_since_surgery;

    Ok(DashboardData {
        is_new_user: false,
        phase: Some(phase),
        phase_color: phase.color().to_string(),
        recovery_week: recovery_week(days),
        progress: Some(progress),
        completed_tasks: tasks.completed,
        total_tasks: tasks.total,
        recent_symptoms: recent,
    })
}
