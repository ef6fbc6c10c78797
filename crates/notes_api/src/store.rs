//! Per-request access to the SQLite record store.

use crate::error::ApiError;
use notes_core::db::{open_db, DbResult};
use notes_core::{NoteService, SqliteNoteRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handler state: where the notes database lives.
///
/// Holds no connection. Every call to `with_service` opens one on Tokio's
/// blocking pool and drops it when the closure returns, so requests never
/// share a handle and SQLite does all write serialization.
#[derive(Debug, Clone)]
pub struct NoteStore {
    db_path: Arc<PathBuf>,
}

impl NoteStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Opens the database once so migrations run before traffic arrives.
    pub fn prepare(&self) -> DbResult<()> {
        open_db(self.db_path()).map(drop)
    }

    /// Runs `f` against a note service bound to a fresh connection.
    pub async fn with_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = open_db(db_path.as_path())?;
            let service = NoteService::new(SqliteNoteRepository::new(&conn));
            f(&service)
        })
        .await?
    }
}
