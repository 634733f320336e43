use serde::{Deserialize, Serialize};

/// Coarse stage of the six-week healing timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryPhase {
    #[serde(rename = "Early Recovery")]
    EarlyRecovery,
    #[serde(rename = "Initial Healing")]
    InitialHealing,
    #[serde(rename = "Active Recovery")]
    ActiveRecovery,
    #[serde(rename = "Final Recovery")]
    FinalRecovery,
    #[serde(rename = "Recovery Complete")]
    RecoveryComplete,
}

impl RecoveryPhase {
    pub const ALL: [RecoveryPhase; 5] = [
        Self::EarlyRecovery,
        Self::InitialHealing,
        Self::ActiveRecovery,
        Self::FinalRecovery,
        Self::RecoveryComplete,
    ];

    /// Upper bounds are inclusive: day 7 is still Early Recovery.
    pub fn from_days(days_since_surgery: i64) -> Self {
        match days_since_surgery {
            d if d <= 7 => Self::EarlyRecovery,
            d if d <= 14 => Self::InitialHealing,
            d if d <= 28 => Self::ActiveRecovery,
            d if d <= 42 => Self::FinalRecovery,
            _ => Self::RecoveryComplete,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EarlyRecovery => "Early Recovery",
            Self::InitialHealing => "Initial Healing",
            Self::ActiveRecovery => "Active Recovery",
            Self::FinalRecovery => "Final Recovery",
            Self::RecoveryComplete => "Recovery Complete",
        }
    }

    /// Presentation color tag for badges and progress bars.
    pub fn color(&self) -> &'static str {
        match self {
            Self::EarlyRecovery => "red",
            Self::InitialHealing => "orange",
            Self::ActiveRecovery => "yellow",
            Self::FinalRecovery => "green",
            Self::RecoveryComplete => "blue",
        }
    }
}

pub const DEFAULT_PHASE_COLOR: &str = "gray";

pub fn get_recovery_phase(days_since_surgery: i64) -> &'static str {
    RecoveryPhase::from_days(days_since_surgery).label()
}

/// Unknown labels map to the neutral color.
pub fn get_recovery_phase_color(phase: &str) -> &'static str {
    RecoveryPhase::from_label(phase)
        .map(|p| p.color())
        .unwrap_or(DEFAULT_PHASE_COLOR)
}

/// "Week N of 6" counter shown next to the phase badge.
pub fn recovery_week(days_since_surgery: i64) -> u8 {
    days_since_surgery.div_euclid(7).clamp(0, 6) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_are_inclusive_on_lower_label() {
        let cases = [
            (i64::MIN, "Early Recovery"),
            (-5, "Early Recovery"),
            (0, "Early Recovery"),
            (7, "Early Recovery"),
            (8, "Initial Healing"),
            (14, "Initial Healing"),
            (15, "Active Recovery"),
            (28, "Active Recovery"),
            (29, "Final Recovery"),
            (42, "Final Recovery"),
            (43, "Recovery Complete"),
            (i64::MAX, "Recovery Complete"),
        ];
        for (days, label) in cases {
            assert_eq!(get_recovery_phase(days), label, "day {days}");
        }
    }

    #[test]
    fn colors_for_known_phases() {
        assert_eq!(get_recovery_phase_color("Early Recovery"), "red");
        assert_eq!(get_recovery_phase_color("Initial Healing"), "orange");
        assert_eq!(get_recovery_phase_color("Active Recovery"), "yellow");
        assert_eq!(get_recovery_phase_color("Final Recovery"), "green");
        assert_eq!(get_recovery_phase_color("Recovery Complete"), "blue");
    }

    #[test]
    fn unknown_label_gets_default_color() {
        assert_eq!(get_recovery_phase_color("NEW USER"), "gray");
        assert_eq!(get_recovery_phase_color(""), "gray");
        // Labels are case-sensitive
        assert_eq!(get_recovery_phase_color("early recovery"), "gray");
    }

    #[test]
    fn label_round_trips_through_from_label() {
        for phase in RecoveryPhase::ALL {
            assert_eq!(RecoveryPhase::from_label(phase.label()), Some(phase));
            assert!(!phase.color().is_empty());
        }
    }

    #[test]
    fn phase_serializes_as_label() {
        let json = serde_json::to_string(&RecoveryPhase::InitialHealing).unwrap();
        assert_eq!(json, "\"Initial Healing\"");
    }

    #[test]
    fn recovery_week_counter() {
        assert_eq!(recovery_week(-3), 0);
        assert_eq!(recovery_week(0), 0);
        assert_eq!(recovery_week(6), 0);
        assert_eq!(recovery_week(7), 1);
        assert_eq!(recovery_week(41), 5);
        assert_eq!(recovery_week(42), 6);
        assert_eq!(recovery_week(400), 6);
    }

    proptest! {
        #[test]
        fn phase_is_total_and_monotonic(days in any::<i64>()) {
            let phase = RecoveryPhase::from_days(days);
            let idx = RecoveryPhase::ALL.iter().position(|p| *p == phase).unwrap();
            if let Some(next) = days.checked_add(1) {
                let next_idx = RecoveryPhase::ALL
                    .iter()
                    .position(|p| *p == RecoveryPhase::from_days(next))
                    .unwrap();
                prop_assert!(next_idx >= idx);
            }
        }
    }
}
