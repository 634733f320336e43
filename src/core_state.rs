//! Shared application state for the HTTP transport.
//!
//! One SQLite connection behind a `Mutex`, plus the immutable brochure
//! corpus parsed once at startup. Handlers hold the lock only for
//! synchronous store calls and never across an `.await`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::brochure;
use crate::db;
use crate::models::BrochureSection;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    db: Mutex<Connection>,
    corpus: Vec<BrochureSection>,
}

impl CoreState {
    /// Opens (or creates) the database at `path` and loads the bundled corpus.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        Self::with_connection(conn)
    }

    /// Fresh in-memory store, used by tests.
    pub fn in_memory() -> Result<Self, CoreError> {
        Self::with_connection(db::open_memory_database()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CoreError> {
        let corpus = brochure::default_corpus()?;
        tracing::debug!(sections = corpus.len(), "Brochure corpus loaded");
        Ok(Self {
            db: Mutex::new(conn),
            corpus,
        })
    }

    /// Acquire the database connection.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.db.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn corpus(&self) -> &[BrochureSection] {
        &self.corpus
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
