use chrono::{DateTime, Utc};

use super::dates::{days_since_surgery, parse_surgery_date};
use super::types::*;
use crate::models::{BrochureSection, SymptomEntry};

/// Six weeks: the canonical recovery window.
pub const RECOVERY_WINDOW_DAYS: f64 = 42.0;

/// Fixed engagement signal. No interaction recency is tracked yet.
pub const ACTIVITY_ENGAGEMENT: f64 = 80.0;

/// Entries averaged at each end of the history for the pain trend.
const TREND_WINDOW: usize = 3;

const TIME_WEIGHT: f64 = 0.4;
const ENGAGEMENT_WEIGHT: f64 = 0.4;
const HEALTH_WEIGHT: f64 = 0.2;

/// Anything carrying a 0–10 self-reported pain score.
pub trait PainReading {
    fn pain_level(&self) -> f64;
}

impl PainReading for SymptomEntry {
    fn pain_level(&self) -> f64 {
        f64::from(self.pain_level)
    }
}

impl PainReading for f64 {
    fn pain_level(&self) -> f64 {
        *self
    }
}

impl PainReading for u8 {
    fn pain_level(&self) -> f64 {
        f64::from(*self)
    }
}

/// Scores recovery from a surgery date string.
///
/// `symptoms` must be ordered most-recent-first. `now` is supplied by the
/// caller (normally `Utc::now()` at the call site).
pub fn calculate_recovery_progress<P: PainReading>(
    surgery_date: &str,
    sections: &[BrochureSection],
    symptoms: &[P],
    now: DateTime<Utc>,
) -> Result<RecoveryProgress, RecoveryError> {
    let surgery = parse_surgery_date(surgery_date)?;
    Ok(calculate_recovery_progress_at(surgery, sections, symptoms, now))
}

/// Same as [`calculate_recovery_progress`] with an already-parsed date.
pub fn calculate_recovery_progress_at<P: PainReading>(
    surgery: DateTime<Utc>,
    sections: &[BrochureSection],
    symptoms: &[P],
    now: DateTime<Utc>,
) -> RecoveryProgress {
    let days = days_since_surgery(surgery, now);
    let brochure_progress = checklist_completion(sections);
    let task_completion = brochure_progress;
    let pain_level_trend = pain_trend(symptoms);
    let activity_engagement = ACTIVITY_ENGAGEMENT;

    // Capped at 100, not floored: a future date goes negative.
    let time_based = (days as f64 / RECOVERY_WINDOW_DAYS * 100.0).min(100.0);
    let engagement = (brochure_progress + task_completion + activity_engagement) / 3.0;
    let health = (100.0 - pain_level_trend * 0.5).max(0.0);

    let weighted =
        time_based * TIME_WEIGHT + engagement * ENGAGEMENT_WEIGHT + health * HEALTH_WEIGHT;
    let overall_progress = round_half_up(weighted).clamp(0, 100) as u8;

    let mut recommendations = Vec::new();
    if brochure_progress < 50.0 {
        recommendations.push(Recommendation::CompleteGuideSections);
    }
    if task_completion < 30.0 {
        recommendations.push(Recommendation::CheckOffDailyTasks);
    }
    // Dormant while engagement is the constant 80.
    if activity_engagement < 50.0 {
        recommendations.push(Recommendation::StayActive);
    }
    if pain_level_trend < 20.0 && !symptoms.is_empty() {
        recommendations.push(Recommendation::MonitorPain);
    }
    if days < 7 {
        recommendations.push(Recommendation::FocusOnRest);
    } else if days < 21 {
        recommendations.push(Recommendation::IncreaseActivity);
    } else if days < RECOVERY_WINDOW_DAYS as i64 {
        recommendations.push(Recommendation::FinalPhase);
    }

    RecoveryProgress {
        overall_progress,
        factors: RecoveryFactors {
            days_since_surgery: days,
            brochure_progress,
            task_completion,
            pain_level_trend,
            activity_engagement,
        },
        breakdown: RecoveryBreakdown {
            time_based: round_half_up(time_based),
            engagement: round_half_up(engagement),
            health: round_half_up(health),
        },
        recommendations: recommendations
            .iter()
            .map(|r| r.message().to_string())
            .collect(),
    }
}

/// Percentage of checklist items marked completed; 0 for an empty corpus.
pub fn checklist_completion(sections: &[BrochureSection]) -> f64 {
    let (completed, total) = sections
        .iter()
        .flat_map(|s| s.items())
        .fold((0usize, 0usize), |(done, total), item| {
            (done + usize::from(item.completed), total + 1)
        });

    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Improvement between the oldest and newest entries.
///
/// Each end averages up to three entries but always divides by three, so
/// short histories are under-averaged. With two entries both windows hold
/// the same readings and the trend is 0.
pub fn pain_trend<P: PainReading>(symptoms: &[P]) -> f64 {
    if symptoms.len() < 2 {
        return 0.0;
    }
    let divisor = TREND_WINDOW as f64;
    let recent: f64 = symptoms
        .iter()
        .take(TREND_WINDOW)
        .map(PainReading::pain_level)
        .sum::<f64>()
        / divisor;
    let older: f64 = symptoms[symptoms.len().saturating_sub(TREND_WINDOW)..]
        .iter()
        .map(PainReading::pain_level)
        .sum::<f64>()
        / divisor;

    ((older - recent) / 10.0 * 100.0).max(0.0)
}

/// Rounds .5 toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::SectionKind;
    use crate::models::{BrochureItem, ContentBlock};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn section(id: &str, completed: &[bool]) -> BrochureSection {
        BrochureSection {
            id: id.into(),
            title: format!("Section {id}"),
            kind: SectionKind::Checklist,
            content: vec![ContentBlock {
                id: format!("{id}-main"),
                title: "Block".into(),
                items: completed
                    .iter()
                    .enumerate()
                    .map(|(i, &done)| BrochureItem {
                        id: format!("item-{i}"),
                        text: format!("Item {i}"),
                        completed: done,
                        notes: None,
                    })
                    .collect(),
            }],
            notes: None,
        }
    }

    const NO_SYMPTOMS: &[f64] = &[];

    // ───────────────────────────────────────
    // Reference scenarios
    // ───────────────────────────────────────

    #[test]
    fn six_weeks_out_with_full_checklist() {
        let corpus = vec![section("a", &[true; 6]), section("b", &[true; 4])];
        let p = calculate_recovery_progress("2025-01-18", &corpus, NO_SYMPTOMS, now()).unwrap();

        assert_eq!(p.factors.days_since_surgery, 42);
        assert_eq!(p.factors.brochure_progress, 100.0);
        assert_eq!(p.factors.task_completion, 100.0);
        assert_eq!(p.factors.pain_level_trend, 0.0);
        assert_eq!(p.breakdown.time_based, 100);
        assert_eq!(p.breakdown.engagement, 93);
        assert_eq!(p.breakdown.health, 100);
        assert_eq!(p.overall_progress, 97);
        assert!(p.recommendations.is_empty());
    }

    #[test]
    fn surgery_day_with_nothing_recorded() {
        let p = calculate_recovery_progress("2025-03-01", &[], NO_SYMPTOMS, now()).unwrap();

        assert_eq!(p.factors.days_since_surgery, 0);
        assert_eq!(p.factors.brochure_progress, 0.0);
        assert_eq!(p.breakdown.time_based, 0);
        assert_eq!(p.breakdown.engagement, 27);
        assert_eq!(p.breakdown.health, 100);
        assert_eq!(p.overall_progress, 31);
        assert_eq!(
            p.recommendations,
            vec![
                "Complete more sections of your aftercare guide",
                "Check off more daily tasks in your recovery guide",
                "Focus on rest and following post-surgery instructions",
            ]
        );
    }

    #[test]
    fn two_entries_divide_by_three_and_cancel_out() {
        let history = [8.0, 2.0];
        assert_eq!(pain_trend(&history), 0.0);

        let p = calculate_recovery_progress("2025-03-01", &[], &history, now()).unwrap();
        assert_eq!(p.factors.pain_level_trend, 0.0);
        assert!(p
            .recommendations
            .contains(&"Continue monitoring your pain levels".to_string()));
    }

    // ───────────────────────────────────────
    // Pain trend
    // ───────────────────────────────────────

    #[test]
    fn single_entry_has_no_trend() {
        assert_eq!(pain_trend(&[9.0]), 0.0);
        assert_eq!(pain_trend(NO_SYMPTOMS), 0.0);
    }

    #[test]
    fn improving_pain_yields_positive_trend() {
        // most-recent-first: recent avg 1, older avg 9
        let history = [1.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        let trend = pain_trend(&history);
        assert!((trend - 80.0).abs() < 1e-9);

        let p = calculate_recovery_progress("2025-03-01", &[], &history, now()).unwrap();
        assert_eq!(p.breakdown.health, 60);
        assert!(!p
            .recommendations
            .contains(&"Continue monitoring your pain levels".to_string()));
    }

    #[test]
    fn worsening_pain_is_floored_at_zero() {
        let history = [9u8, 9, 9, 1, 1, 1];
        assert_eq!(pain_trend(&history), 0.0);
    }

    #[test]
    fn overlapping_windows_with_four_entries() {
        // recent = (2+2+2)/3 = 2, older = (2+2+8)/3 = 4 → 20
        let history = [2.0, 2.0, 2.0, 8.0];
        let trend = pain_trend(&history);
        assert!((trend - 20.0).abs() < 1e-9);

        let p = calculate_recovery_progress("2025-03-01", &[], &history, now()).unwrap();
        // Exactly 20 is not "< 20"
        assert!(!p
            .recommendations
            .contains(&"Continue monitoring your pain levels".to_string()));
    }

    #[test]
    fn trend_has_no_upper_cap_for_out_of_range_input() {
        let history = [0.0, 0.0, 0.0, 50.0, 50.0, 50.0];
        let trend = pain_trend(&history);
        assert!((trend - 500.0).abs() < 1e-9);

        let p = calculate_recovery_progress("2025-03-01", &[], &history, now()).unwrap();
        assert_eq!(p.breakdown.health, 0);
    }

    // ───────────────────────────────────────
    // Checklist completion
    // ───────────────────────────────────────

    #[test]
    fn completion_counts_items_across_sections() {
        let corpus = vec![section("a", &[true, false, false]), section("b", &[true])];
        assert_eq!(checklist_completion(&corpus), 50.0);
    }

    #[test]
    fn sections_without_items_do_not_count() {
        let corpus = vec![section("a", &[]), section("b", &[true, false])];
        assert_eq!(checklist_completion(&corpus), 50.0);
        assert_eq!(checklist_completion(&[section("empty", &[])]), 0.0);
    }

    #[test]
    fn symptom_entries_feed_the_trend() {
        let entry = |level: u8| SymptomEntry {
            id: uuid::Uuid::new_v4(),
            date: now().date_naive(),
            pain_level: level,
            location: None,
            description: None,
            medications: None,
            created_at: now(),
            updated_at: now(),
        };
        let history = vec![entry(2), entry(2), entry(2), entry(5), entry(5), entry(5)];
        assert!((pain_trend(&history) - 30.0).abs() < 1e-9);
    }

    // ───────────────────────────────────────
    // Time handling and recommendations
    // ───────────────────────────────────────

    #[test]
    fn phase_recommendation_by_day_count() {
        let rest = "Focus on rest and following post-surgery instructions";
        let gradual = "Gradually increase activity as recommended";
        let final_phase = "You're in the final recovery phase - maintain good habits";
        let cases = [
            ("2025-02-23", 6, rest),
            ("2025-02-22", 7, gradual),
            ("2025-02-09", 20, gradual),
            ("2025-02-08", 21, final_phase),
            ("2025-01-19", 41, final_phase),
        ];
        for (date, days, expected) in cases {
            let p = calculate_recovery_progress(date, &[], NO_SYMPTOMS, now()).unwrap();
            assert_eq!(p.factors.days_since_surgery, days, "{date}");
            assert_eq!(p.recommendations.last().unwrap(), expected, "{date}");
        }
    }

    #[test]
    fn no_phase_recommendation_after_six_weeks() {
        let corpus = vec![section("a", &[true, true])];
        let p = calculate_recovery_progress("2024-06-01", &corpus, NO_SYMPTOMS, now()).unwrap();
        assert!(p.factors.days_since_surgery >= 42);
        assert_eq!(p.breakdown.time_based, 100);
        assert!(p.recommendations.is_empty());
    }

    #[test]
    fn future_surgery_goes_negative_but_overall_stays_in_range() {
        let p = calculate_recovery_progress("2025-03-15", &[], NO_SYMPTOMS, now()).unwrap();
        assert_eq!(p.factors.days_since_surgery, -14);
        assert_eq!(p.breakdown.time_based, -33);
        // -13.33 + 10.67 + 20 = 17.33
        assert_eq!(p.overall_progress, 17);

        let far = calculate_recovery_progress("2100-01-01", &[], NO_SYMPTOMS, now()).unwrap();
        assert_eq!(far.overall_progress, 0);
        assert_eq!(
            far.recommendations.last().unwrap(),
            "Focus on rest and following post-surgery instructions"
        );
    }

    #[test]
    fn partial_checklist_triggers_only_guide_recommendation() {
        // 2 of 5 = 40%: below 50 but not below 30
        let corpus = vec![section("a", &[true, true, false, false, false])];
        let p = calculate_recovery_progress("2024-06-01", &corpus, NO_SYMPTOMS, now()).unwrap();
        assert_eq!(
            p.recommendations,
            vec!["Complete more sections of your aftercare guide"]
        );
    }

    #[test]
    fn invalid_date_fails_fast() {
        let err = calculate_recovery_progress("soon", &[], NO_SYMPTOMS, now()).unwrap_err();
        assert_eq!(err, RecoveryError::InvalidSurgeryDate("soon".into()));
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(96.49), 96);
    }

    // ───────────────────────────────────────
    // Properties
    // ───────────────────────────────────────

    fn arb_corpus() -> impl Strategy<Value = Vec<BrochureSection>> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), 0..8), 0..6).prop_map(
            |sections| {
                sections
                    .iter()
                    .enumerate()
                    .map(|(i, items)| section(&format!("s{i}"), items))
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn completion_matches_ratio(corpus in arb_corpus()) {
            let total: usize = corpus.iter().map(|s| s.items().count()).sum();
            let done: usize = corpus
                .iter()
                .map(|s| s.items().filter(|i| i.completed).count())
                .sum();
            let pct = checklist_completion(&corpus);
            prop_assert!((0.0..=100.0).contains(&pct));
            if total == 0 {
                prop_assert_eq!(pct, 0.0);
            } else {
                prop_assert_eq!(pct, done as f64 / total as f64 * 100.0);
            }
        }

        #[test]
        fn overall_always_in_bounds(
            offset_days in -40_000i64..40_000,
            corpus in arb_corpus(),
            pain in prop::collection::vec(-1.0e6f64..1.0e6, 0..12),
        ) {
            let surgery = now() - chrono::Duration::days(offset_days);
            let p = calculate_recovery_progress_at(surgery, &corpus, &pain, now());
            prop_assert!(p.overall_progress <= 100);
            prop_assert_eq!(p.factors.task_completion, p.factors.brochure_progress);
            prop_assert!(p.factors.pain_level_trend >= 0.0);
        }

        #[test]
        fn six_weeks_saturates_time_score(offset_days in 42i64..20_000) {
            let surgery = now() - chrono::Duration::days(offset_days);
            let p = calculate_recovery_progress_at(surgery, &[], NO_SYMPTOMS, now());
            prop_assert_eq!(p.breakdown.time_based, 100);
        }

        #[test]
        fn short_history_has_zero_trend(pain in prop::collection::vec(0u8..=10, 0..2)) {
            prop_assert_eq!(pain_trend(&pain), 0.0);
        }

        #[test]
        fn identical_inputs_identical_output(
            offset_days in -400i64..400,
            corpus in arb_corpus(),
            pain in prop::collection::vec(0u8..=10, 0..10),
        ) {
            let surgery = now() - chrono::Duration::days(offset_days);
            let first = calculate_recovery_progress_at(surgery, &corpus, &pain, now());
            let second = calculate_recovery_progress_at(surgery, &corpus, &pain, now());
            prop_assert_eq!(first, second);
        }
    }
}
