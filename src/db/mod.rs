pub mod sqlite;

pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundled brochure content is malformed: {0}")]
    Corpus(String),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

/// Failure of a validated write: bad input or storage.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Timestamps are stored as RFC 3339 UTC with millisecond precision so
/// lexical order matches chronological order.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<chrono::DateTime<chrono::Utc>, DatabaseError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid timestamp {value:?}: {e}")))
}

pub fn parse_date(value: &str) -> Result<chrono::NaiveDate, DatabaseError> {
    chrono::NaiveDate::parse_from_str(value, crate::validation::DATE_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid date {value:?}: {e}")))
}
