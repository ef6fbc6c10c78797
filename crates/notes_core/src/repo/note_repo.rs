//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Ids come from SQLite `AUTOINCREMENT` and are never reused after delete.
//! - `update` and `delete` report `NotFound` when no row matched.
//! - Writes return the row as stored, so callers never need a second read.
//! - Timestamps are epoch milliseconds; `updated_at` never drops below
//!   `created_at`, even if the wall clock steps back between writes.

use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";
const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "notes store is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "notes store table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD-by-id access to stored notes.
pub trait NoteRepository {
    /// Looks up one note. `Ok(None)` is the only "not found" signal.
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Returns every note in ascending id order.
    fn list_all(&self) -> RepoResult<Vec<Note>>;
    /// Stores a new note and returns it with its assigned id.
    fn insert(&self, draft: &NoteDraft) -> RepoResult<Note>;
    /// Replaces title and content of an existing note.
    fn update(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<Note>;
    /// Removes a note permanently.
    fn delete(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository borrowing a migrated connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`, which
    /// already guarantee the migrated schema. Skips any schema inspection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps `conn` after checking it carries the `notes` schema. Use for
    /// connections that did not come through `open_db`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_notes_schema(conn)?;
        Ok(Self::new(conn))
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1;"),
                [id],
                parse_note_row,
            )
            .optional()?)
    }

    fn list_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn insert(&self, draft: &NoteDraft) -> RepoResult<Note> {
        let note = self.conn.query_row(
            &format!(
                "INSERT INTO notes (title, content, created_at, updated_at)
                 VALUES (?1, ?2, {NOW_MS_SQL}, {NOW_MS_SQL})
                 RETURNING {NOTE_COLUMNS};"
            ),
            params![draft.title, draft.content],
            parse_note_row,
        )?;
        Ok(note)
    }

    fn update(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<Note> {
        self.conn
            .query_row(
                &format!(
                    "UPDATE notes
                     SET title = ?2,
                         content = ?3,
                         updated_at = MAX(created_at, {NOW_MS_SQL})
                     WHERE id = ?1
                     RETURNING {NOTE_COLUMNS};"
                ),
                params![id, draft.title, draft.content],
                parse_note_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn ensure_notes_schema(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "content", "created_at", "updated_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get("name")?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
