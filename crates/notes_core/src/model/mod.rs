//! Domain model for the notes service.
//!
//! # Invariants
//! - A note's `id` is assigned by the store and never changes.
//! - Write payloads become a `NoteDraft` only through shape validation.

pub mod note;
