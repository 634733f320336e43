use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::phase::RecoveryPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("Invalid surgery date: {0:?}")]
    InvalidSurgeryDate(String),
}

/// Raw signals the score is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryFactors {
    /// Whole days elapsed; negative when the surgery date is in the future.
    pub days_since_surgery: i64,
    pub brochure_progress: f64,
    /// Alias of `brochure_progress`: daily tasks are the checklist items.
    pub task_completion: f64,
    /// Pain improvement, older average minus recent average, as a
    /// percentage of the 10-point scale. Floored at 0, not capped.
    pub pain_level_trend: f64,
    pub activity_engagement: f64,
}

/// The three weighted sub-scores, rounded but not clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryBreakdown {
    pub time_based: i64,
    pub engagement: i64,
    pub health: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryProgress {
    pub overall_progress: u8,
    pub factors: RecoveryFactors,
    pub breakdown: RecoveryBreakdown,
    pub recommendations: Vec<String>,
}

impl RecoveryProgress {
    pub fn phase(&self) -> RecoveryPhase {
        RecoveryPhase::from_days(self.factors.days_since_surgery)
    }
}

/// Advice emitted by the scoring rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    CompleteGuideSections,
    CheckOffDailyTasks,
    StayActive,
    MonitorPain,
    FocusOnRest,
    IncreaseActivity,
    FinalPhase,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CompleteGuideSections => "Complete more sections of your aftercare guide",
            Self::CheckOffDailyTasks => "Check off more daily tasks in your recovery guide",
            Self::StayActive => "Stay active with your recovery tracking",
            Self::MonitorPain => "Continue monitoring your pain levels",
            Self::FocusOnRest => "Focus on rest and following post-surgery instructions",
            Self::IncreaseActivity => "Gradually increase activity as recommended",
            Self::FinalPhase => "You're in the final recovery phase - maintain good habits",
        }
    }
}
