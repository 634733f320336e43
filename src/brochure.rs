//! Aftercare checklist: the bundled brochure corpus plus persisted
//! per-item completion and per-section notes.
//!
//! The corpus is static content shipped with the binary. Only progress
//! lives in SQLite, keyed by `(section_id, item_id)`; item ids are not
//! unique across sections.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::{format_timestamp, parse_timestamp, DatabaseError, StoreError};
use crate::models::{BrochureItem, BrochureSection, ContentBlock, ItemProgress, ProgressUpdate};
use crate::validation::{check_max_len, normalize_optional, ValidationError};

pub const DEFAULT_BROCHURE_ID: &str = "myomectomy";

pub const NOTES_MAX_LEN: usize = 1000;

const MYOMECTOMY_JSON: &str = include_str!("../resources/brochures/myomectomy.json");

/// Completed vs. total checklist items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCount {
    pub completed: usize,
    pub total: usize,
}

// ═══════════════════════════════════════════
// Corpus
// ═══════════════════════════════════════════

/// Parses the bundled myomectomy aftercare brochure.
pub fn default_corpus() -> Result<Vec<BrochureSection>, DatabaseError> {
    serde_json::from_str(MYOMECTOMY_JSON).map_err(|e| DatabaseError::Corpus(e.to_string()))
}

pub fn find_section<'a>(
    corpus: &'a [BrochureSection],
    section_id: &str,
) -> Option<&'a BrochureSection> {
    corpus.iter().find(|s| s.id == section_id)
}

/// Finds the content block holding `item_id` within one section.
fn locate_item<'a>(
    corpus: &'a [BrochureSection],
    section_id: &str,
    item_id: &str,
) -> Option<(&'a ContentBlock, &'a BrochureItem)> {
    find_section(corpus, section_id)?
        .content
        .iter()
        .find_map(|block| {
            block
                .items
                .iter()
                .find(|item| item.id == item_id)
                .map(|item| (block, item))
        })
}

pub fn count_items(sections: &[BrochureSection]) -> TaskCount {
    sections
        .iter()
        .flat_map(|s| s.items())
        .fold(TaskCount::default(), |mut acc, item| {
            acc.total += 1;
            if item.completed {
                acc.completed += 1;
            }
            acc
        })
}

/// Overlays persisted progress and section notes onto a copy of the corpus.
///
/// Records referencing sections or items that no longer exist are ignored.
pub fn merge_progress(
    corpus: &[BrochureSection],
    progress: &[ItemProgress],
    section_notes: &HashMap<String, String>,
) -> Vec<BrochureSection> {
    let by_key: HashMap<(&str, &str), &ItemProgress> = progress
        .iter()
        .map(|p| ((p.section_id.as_str(), p.item_id.as_str()), p))
        .collect();

    corpus
        .iter()
        .map(|section| {
            let mut merged = section.clone();
            if let Some(notes) = section_notes.get(&section.id) {
                merged.notes = Some(notes.clone());
            }
            for block in &mut merged.content {
                for item in &mut block.items {
                    if let Some(p) = by_key.get(&(section.id.as_str(), item.id.as_str())) {
                        item.completed = p.completed;
                        item.notes = p.notes.clone();
                    }
                }
            }
            merged
        })
        .collect()
}

// ═══════════════════════════════════════════
// Repository functions
// ═══════════════════════════════════════════

pub fn list_progress(conn: &Connection) -> Result<Vec<ItemProgress>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT section_id, content_block_id, item_id, completed, notes, updated_at
         FROM brochure_progress
         ORDER BY section_id, item_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i32>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut progress = Vec::new();
    for row in rows {
        let (section_id, content_block_id, item_id, completed, notes, updated_at) = row?;
        progress.push(ItemProgress {
            section_id,
            content_block_id,
            item_id,
            completed: completed != 0,
            notes,
            updated_at: parse_timestamp(&updated_at)?,
        });
    }
    Ok(progress)
}

pub fn list_section_notes(conn: &Connection) -> Result<HashMap<String, String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT section_id, notes FROM section_notes")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    let mut notes = HashMap::new();
    for row in rows {
        let (section_id, text): (String, String) = row?;
        notes.insert(section_id, text);
    }
    Ok(notes)
}

/// Corpus with every persisted record applied.
pub fn load_merged(
    conn: &Connection,
    corpus: &[BrochureSection],
) -> Result<Vec<BrochureSection>, DatabaseError> {
    let progress = list_progress(conn)?;
    let notes = list_section_notes(conn)?;
    Ok(merge_progress(corpus, &progress, &notes))
}

pub fn validate_update(update: &ProgressUpdate) -> Result<(), ValidationError> {
    if update.section_id.trim().is_empty() {
        return Err(ValidationError::Required { field: "Section id" });
    }
    if update.item_id.trim().is_empty() {
        return Err(ValidationError::Required { field: "Item id" });
    }
    check_max_len("Notes", update.notes.as_deref(), NOTES_MAX_LEN)
}

/// Inserts or replaces the record for `(section_id, item_id)`.
///
/// Absent notes keep whatever was stored before.
pub fn upsert_item_progress(
    conn: &Connection,
    corpus: &[BrochureSection],
    update: &ProgressUpdate,
    now: DateTime<Utc>,
) -> Result<ItemProgress, StoreError> {
    validate_update(update)?;
    let (block, _) = locate_item(corpus, &update.section_id, &update.item_id).ok_or_else(|| {
        DatabaseError::not_found(
            "BrochureItem",
            format!("{}/{}", update.section_id, update.item_id),
        )
    })?;

    let notes = normalize_optional(update.notes.clone());
    conn.execute(
        "INSERT INTO brochure_progress
             (section_id, content_block_id, item_id, completed, notes, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(section_id, item_id) DO UPDATE SET
             content_block_id = excluded.content_block_id,
             completed = excluded.completed,
             notes = COALESCE(excluded.notes, brochure_progress.notes),
             updated_at = excluded.updated_at",
        params![
            update.section_id,
            block.id,
            update.item_id,
            update.completed as i32,
            notes,
            format_timestamp(&now),
        ],
    )
    .map_err(DatabaseError::from)?;
    tracing::debug!(
        section_id = %update.section_id,
        item_id = %update.item_id,
        completed = update.completed,
        "Checklist item updated"
    );

    Ok(get_item_progress(conn, &update.section_id, &update.item_id)?)
}

fn get_item_progress(
    conn: &Connection,
    section_id: &str,
    item_id: &str,
) -> Result<ItemProgress, DatabaseError> {
    let row = conn.query_row(
        "SELECT content_block_id, completed, notes, updated_at
         FROM brochure_progress WHERE section_id = ?1 AND item_id = ?2",
        params![section_id, item_id],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    );
    let (content_block_id, completed, notes, updated_at) = match row {
        Ok(r) => r,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(DatabaseError::not_found(
                "ItemProgress",
                format!("{section_id}/{item_id}"),
            ))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(ItemProgress {
        section_id: section_id.to_string(),
        content_block_id,
        item_id: item_id.to_string(),
        completed: completed != 0,
        notes,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Sets free-text notes for a section. Blank notes clear them.
pub fn set_section_notes(
    conn: &Connection,
    corpus: &[BrochureSection],
    section_id: &str,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    check_max_len("Notes", notes.as_deref(), NOTES_MAX_LEN)?;
    if find_section(corpus, section_id).is_none() {
        return Err(DatabaseError::not_found("BrochureSection", section_id).into());
    }
    match normalize_optional(notes) {
        Some(text) => {
            conn.execute(
                "INSERT INTO section_notes (section_id, notes, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(section_id) DO UPDATE SET
                     notes = excluded.notes,
                     updated_at = excluded.updated_at",
                params![section_id, text, format_timestamp(&now)],
            )
            .map_err(DatabaseError::from)?;
        }
        None => {
            conn.execute(
                "DELETE FROM section_notes WHERE section_id = ?1",
                params![section_id],
            )
            .map_err(DatabaseError::from)?;
        }
    }
    tracing::debug!(section_id, "Section notes updated");
    Ok(())
}

/// Inverts the merged completion state of every item in one section and
/// returns the section as it now stands.
pub fn toggle_section(
    conn: &Connection,
    corpus: &[BrochureSection],
    section_id: &str,
    now: DateTime<Utc>,
) -> Result<BrochureSection, DatabaseError> {
    let merged = load_merged(conn, corpus)?;
    let section = find_section(&merged, section_id)
        .ok_or_else(|| DatabaseError::not_found("BrochureSection", section_id))?;

    let tx = conn.unchecked_transaction()?;
    let stamp = format_timestamp(&now);
    for block in &section.content {
        for item in &block.items {
            tx.execute(
                "INSERT INTO brochure_progress
                     (section_id, content_block_id, item_id, completed, notes, updated_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, ?5)
                 ON CONFLICT(section_id, item_id) DO UPDATE SET
                     completed = excluded.completed,
                     updated_at = excluded.updated_at",
                params![section_id, block.id, item.id, (!item.completed) as i32, stamp],
            )?;
        }
    }
    tx.commit()?;
    tracing::debug!(section_id, "Section toggled");

    let merged = load_merged(conn, corpus)?;
    find_section(&merged, section_id)
        .cloned()
        .ok_or_else(|| DatabaseError::not_found("BrochureSection", section_id))
}

/// Clears all item progress and section notes.
pub fn reset_progress(conn: &Connection) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let items = tx.execute("DELETE FROM brochure_progress", [])?;
    let notes = tx.execute("DELETE FROM section_notes", [])?;
    tx.commit()?;
    tracing::debug!(items, notes, "Checklist progress reset");
    Ok(())
}
