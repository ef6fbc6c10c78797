//! Record store access for notes.
//!
//! # Responsibility
//! - Define the `NoteRepository` contract used by the service layer.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - "Not found" is an explicit value (`Ok(None)` or `RepoError::NotFound`),
//!   never inferred from the shape of a returned record.

pub mod note_repo;
