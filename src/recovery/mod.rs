//! Recovery progress scoring.
//!
//! Combines time since surgery, aftercare checklist completion and the
//! self-reported pain trend into one percentage, a three-part breakdown
//! and an ordered list of recommendations. Everything here is pure: the
//! caller supplies "now", so the same inputs always give the same output.

pub mod calculator;
pub mod dates;
pub mod phase;
pub mod types;

pub use calculator::{
    calculate_recovery_progress, calculate_recovery_progress_at, checklist_completion,
    pain_trend, PainReading, ACTIVITY_ENGAGEMENT, RECOVERY_WINDOW_DAYS,
};
pub use dates::{days_since_surgery, parse_surgery_date, surgery_instant};
pub use phase::{
    get_recovery_phase, get_recovery_phase_color, recovery_week, RecoveryPhase, DEFAULT_PHASE_COLOR,
};
pub use types::*;
