//! Note use-case service.
//!
//! # Invariants
//! - Writes persist only payloads that passed `NoteDraft::from_json`.
//! - `update_note` checks existence before validating, so an unknown id wins
//!   over an invalid payload.
//! - A failed validation never touches the store.

use crate::model::note::{Note, NoteDraft, NoteId, ValidationErrors};
use crate::repo::note_repo::{NoteRepository, RepoError};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Payload failed shape validation.
    Invalid(ValidationErrors),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid note payload: {errors}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationErrors> for NoteServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All notes, ascending id.
    pub fn list_notes(&self) -> NoteServiceResult<Vec<Note>> {
        Ok(self.repo.list_all()?)
    }

    /// One note, or `NoteNotFound`.
    pub fn get_note(&self, id: NoteId) -> NoteServiceResult<Note> {
        self.repo
            .find_by_id(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Validates `payload` and stores it as a new note.
    pub fn create_note(&self, payload: &Value) -> NoteServiceResult<Note> {
        let draft = NoteDraft::from_json(payload)?;
        Ok(self.repo.insert(&draft)?)
    }

    /// Replaces title and content of note `id` with the validated `payload`.
    pub fn update_note(&self, id: NoteId, payload: &Value) -> NoteServiceResult<Note> {
        self.get_note(id)?;
        let draft = NoteDraft::from_json(payload)?;
        Ok(self.repo.update(id, &draft)?)
    }

    /// Permanently removes note `id`.
    pub fn delete_note(&self, id: NoteId) -> NoteServiceResult<()> {
        Ok(self.repo.delete(id)?)
    }
}
