//! Symptom log: validation and repository functions.
//!
//! Entries are returned most-recent-first by creation time, which is the
//! ordering the recovery engine expects for its pain trend.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{format_timestamp, parse_date, parse_timestamp, DatabaseError, StoreError};
use crate::models::{SymptomEntry, SymptomEntryRequest, SymptomUpdate};
use crate::validation::{check_max_len, normalize_optional, parse_iso_date, ValidationError};

pub const PAIN_MIN: i32 = 0;
pub const PAIN_MAX: i32 = 10;

pub const LOCATION_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const MEDICATIONS_MAX_LEN: usize = 500;

const SELECT_COLUMNS: &str =
    "SELECT id, date, pain_level, location, description, medications, created_at, updated_at
     FROM symptoms";

// ═══════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════

pub fn check_pain_level(pain_level: i32) -> Result<u8, ValidationError> {
    if !(PAIN_MIN..=PAIN_MAX).contains(&pain_level) {
        return Err(ValidationError::PainLevelOutOfRange(pain_level));
    }
    Ok(pain_level as u8)
}

fn check_text_fields(
    location: Option<&str>,
    description: Option<&str>,
    medications: Option<&str>,
) -> Result<(), ValidationError> {
    check_max_len("Location", location, LOCATION_MAX_LEN)?;
    check_max_len("Description", description, DESCRIPTION_MAX_LEN)?;
    check_max_len("Medications", medications, MEDICATIONS_MAX_LEN)
}

pub fn validate_entry(request: &SymptomEntryRequest) -> Result<(), ValidationError> {
    parse_iso_date("Date", &request.date)?;
    check_pain_level(request.pain_level)?;
    check_text_fields(
        request.location.as_deref(),
        request.description.as_deref(),
        request.medications.as_deref(),
    )
}

// ═══════════════════════════════════════════
// Repository functions
// ═══════════════════════════════════════════

/// Records a new symptom entry. Input is validated first.
pub fn record_symptom(
    conn: &Connection,
    request: &SymptomEntryRequest,
    now: DateTime<Utc>,
) -> Result<SymptomEntry, StoreError> {
    validate_entry(request)?;
    // Stored timestamps keep millisecond precision only.
    let now = now.trunc_subsecs(3);
    let entry = SymptomEntry {
        id: Uuid::new_v4(),
        date: parse_iso_date("Date", &request.date)?,
        pain_level: check_pain_level(request.pain_level)?,
        location: normalize_optional(request.location.clone()),
        description: normalize_optional(request.description.clone()),
        medications: normalize_optional(request.medications.clone()),
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO symptoms (id, date, pain_level, location, description,
         medications, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id.to_string(),
            entry.date.to_string(),
            entry.pain_level as i32,
            entry.location,
            entry.description,
            entry.medications,
            format_timestamp(&entry.created_at),
            format_timestamp(&entry.updated_at),
        ],
    )
    .map_err(DatabaseError::from)?;
    tracing::debug!(id = %entry.id, pain_level = entry.pain_level, "Symptom recorded");

    Ok(entry)
}

/// Full history, most recent first. Ties on creation time fall back to
/// insertion order.
pub fn list_symptoms(conn: &Connection) -> Result<Vec<SymptomEntry>, DatabaseError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], raw_row)?;

    let mut symptoms = Vec::new();
    for row in rows {
        symptoms.push(row?.into_entry()?);
    }
    Ok(symptoms)
}

/// The `limit` most recent entries.
pub fn recent_symptoms(conn: &Connection, limit: usize) -> Result<Vec<SymptomEntry>, DatabaseError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit as i64], raw_row)?;

    let mut symptoms = Vec::new();
    for row in rows {
        symptoms.push(row?.into_entry()?);
    }
    Ok(symptoms)
}

pub fn get_symptom(conn: &Connection, id: &Uuid) -> Result<SymptomEntry, DatabaseError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    match conn.query_row(&sql, params![id.to_string()], raw_row) {
        Ok(raw) => raw.into_entry(),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DatabaseError::not_found("Symptom", id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies a partial update. Absent fields keep their stored value and a
/// blank text field clears it. The id and creation time never change.
pub fn update_symptom(
    conn: &Connection,
    id: &Uuid,
    update: &SymptomUpdate,
    now: DateTime<Utc>,
) -> Result<SymptomEntry, StoreError> {
    let mut entry = get_symptom(conn, id)?;

    if let Some(ref date) = update.date {
        entry.date = parse_iso_date("Date", date)?;
    }
    if let Some(pain_level) = update.pain_level {
        entry.pain_level = check_pain_level(pain_level)?;
    }
    check_text_fields(
        update.location.as_deref(),
        update.description.as_deref(),
        update.medications.as_deref(),
    )?;
    if update.location.is_some() {
        entry.location = normalize_optional(update.location.clone());
    }
    if update.description.is_some() {
        entry.description = normalize_optional(update.description.clone());
    }
    if update.medications.is_some() {
        entry.medications = normalize_optional(update.medications.clone());
    }
    entry.updated_at = now.trunc_subsecs(3);

    let updated = conn
        .execute(
            "UPDATE symptoms SET date = ?1, pain_level = ?2, location = ?3,
             description = ?4, medications = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                entry.date.to_string(),
                entry.pain_level as i32,
                entry.location,
                entry.description,
                entry.medications,
                format_timestamp(&entry.updated_at),
                id.to_string(),
            ],
        )
        .map_err(DatabaseError::from)?;
    if updated == 0 {
        return Err(DatabaseError::not_found("Symptom", id.to_string()).into());
    }
    tracing::debug!(id = %id, "Symptom updated");

    Ok(entry)
}

/// Hard-deletes a symptom entry.
pub fn delete_symptom(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM symptoms WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Symptom", id.to_string()));
    }
    tracing::debug!(id = %id, "Symptom deleted");
    Ok(())
}

/// Deletes every entry. Returns how many were removed.
pub fn clear_symptoms(conn: &Connection) -> Result<usize, DatabaseError> {
    let deleted = conn.execute("DELETE FROM symptoms", [])?;
    tracing::debug!(deleted, "Symptom log cleared");
    Ok(deleted)
}

/// Arithmetic mean of all pain levels, 0 for an empty log.
pub fn average_pain(history: &[SymptomEntry]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let total: u32 = history.iter().map(|e| u32::from(e.pain_level)).sum();
    f64::from(total) / history.len() as f64
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

struct RawSymptom {
    id: String,
    date: String,
    pain_level: i32,
    location: Option<String>,
    description: Option<String>,
    medications: Option<String>,
    created_at: String,
    updated_at: String,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawSymptom> {
    Ok(RawSymptom {
        id: row.get(0)?,
        date: row.get(1)?,
        pain_level: row.get(2)?,
        location: row.get(3)?,
        description: row.get(4)?,
        medications: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl RawSymptom {
    fn into_entry(self) -> Result<SymptomEntry, DatabaseError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| {
            DatabaseError::ConstraintViolation(format!("Invalid symptom id {:?}: {e}", self.id))
        })?;
        Ok(SymptomEntry {
            id,
            date: parse_date(&self.date)?,
            pain_level: self.pain_level.clamp(PAIN_MIN, PAIN_MAX) as u8,
            location: self.location,
            description: self.description,
            medications: self.medications,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
