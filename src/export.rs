//! Recovery data export: a workbook-shaped report of string rows that a
//! client can render as a spreadsheet or table.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::brochure::{count_items, list_progress, load_merged};
use crate::db::DatabaseError;
use crate::journal::{average_pain, list_symptoms};
use crate::models::{BrochureSection, ItemProgress, SymptomEntry, UserProfile};
use crate::profile::get_profile;
use crate::recovery::{calculate_recovery_progress_at, surgery_instant, RecoveryProgress};

const NOT_SET: &str = "Not set";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryReport {
    /// Suggested download name without extension.
    pub file_stem: String,
    pub generated_at: DateTime<Utc>,
    pub sheets: Vec<ReportSheet>,
}

impl RecoveryReport {
    pub fn sheet(&self, name: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn sheet(name: &str, header: &[&str], rows: Vec<Vec<String>>) -> ReportSheet {
    ReportSheet {
        name: name.to_string(),
        header: header.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn yes_no(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}

fn row<const N: usize>(cells: [String; N]) -> Vec<String> {
    cells.into()
}

/// Builds the export for the saved profile. Fails with `NotFound` when no
/// profile exists yet.
pub fn build_report(
    conn: &Connection,
    corpus: &[BrochureSection],
    now: DateTime<Utc>,
) -> Result<RecoveryReport, DatabaseError> {
    let profile = get_profile(conn)?.ok_or_else(|| DatabaseError::not_found("Profile", "1"))?;
    let sections = load_merged(conn, corpus)?;
    let progress_records = list_progress(conn)?;
    let history = list_symptoms(conn)?;

    let progress = profile
        .surgery_date
        .map(|date| calculate_recovery_progress_at(surgery_instant(date), &sections, &history, now));

    let export_date = now.date_naive().to_string();
    let sheets = vec![
        profile_sheet(&profile, progress.as_ref(), &export_date),
        brochure_sheet(corpus, &progress_records),
        symptom_sheet(&history),
        metrics_sheet(progress.as_ref(), &sections, &history),
    ];

    tracing::debug!(symptoms = history.len(), "Export report built");
    Ok(RecoveryReport {
        file_stem: format!(
            "recovery-data-{}-{}-{}",
            profile.first_name, profile.last_name, export_date
        ),
        generated_at: now,
        sheets,
    })
}

fn profile_sheet(
    profile: &UserProfile,
    progress: Option<&RecoveryProgress>,
    export_date: &str,
) -> ReportSheet {
    let surgery_date = profile
        .surgery_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_SET.into());
    let (days, phase, overall) = match progress {
        Some(p) => (
            p.factors.days_since_surgery.to_string(),
            p.phase().label().to_string(),
            format!("{}%", p.overall_progress),
        ),
        None => (NOT_SET.into(), NOT_SET.into(), "0%".into()),
    };

    sheet(
        "User Profile",
        &["Field", "Value"],
        vec![
            row(["Name".into(), profile.full_name()]),
            row(["Email".into(), profile.email.clone()]),
            row(["Surgery Date".into(), surgery_date]),
            row(["Recovery Days".into(), days]),
            row(["Recovery Phase".into(), phase]),
            row(["Overall Progress".into(), overall]),
            row(["Export Date".into(), export_date.to_string()]),
        ],
    )
}

/// One row per corpus item. Completion is looked up by the full
/// `(section, block, item)` key.
fn brochure_sheet(corpus: &[BrochureSection], records: &[ItemProgress]) -> ReportSheet {
    let mut rows = Vec::new();
    for section in corpus {
        for block in &section.content {
            for item in &block.items {
                let record = records.iter().find(|p| {
                    p.section_id == section.id
                        && p.content_block_id == block.id
                        && p.item_id == item.id
                });
                rows.push(row([
                    section.title.clone(),
                    item.text.clone(),
                    yes_no(record.is_some_and(|p| p.completed)),
                    record.and_then(|p| p.notes.clone()).unwrap_or_default(),
                ]));
            }
        }
    }
    sheet("Brochure Progress", &["Section", "Item", "Completed", "Notes"], rows)
}

fn symptom_sheet(history: &[SymptomEntry]) -> ReportSheet {
    let rows = history
        .iter()
        .map(|entry| {
            row([
                entry.date.to_string(),
                entry.pain_level.to_string(),
                entry.location.clone().unwrap_or_default(),
                entry.description.clone().unwrap_or_default(),
                entry.medications.clone().unwrap_or_default(),
            ])
        })
        .collect();
    sheet(
        "Symptom Entries",
        &["Date", "Pain Level", "Location", "Description", "Medications"],
        rows,
    )
}

fn metrics_sheet(
    progress: Option<&RecoveryProgress>,
    sections: &[BrochureSection],
    history: &[SymptomEntry],
) -> ReportSheet {
    let tasks = count_items(sections);
    let completion_pct = if tasks.total > 0 {
        (tasks.completed as f64 / tasks.total as f64 * 100.0).round() as i64
    } else {
        0
    };
    let (overall, days, brochure) = match progress {
        Some(p) => (
            format!("{}%", p.overall_progress),
            p.factors.days_since_surgery.to_string(),
            format!("{}%", p.factors.brochure_progress.round() as i64),
        ),
        None => ("0%".into(), NOT_SET.into(), format!("{completion_pct}%")),
    };

    sheet(
        "Recovery Metrics",
        &["Metric", "Value"],
        vec![
            row(["Overall Progress".into(), overall]),
            row(["Days Since Surgery".into(), days]),
            row(["Brochure Progress".into(), brochure]),
            row(["Average Pain Level".into(), format!("{:.1}", average_pain(history))]),
            row(["Tasks Completed".into(), tasks.completed.to_string()]),
            row(["Task Completion Percentage".into(), completion_pct.to_string()]),
        ],
    )
}
