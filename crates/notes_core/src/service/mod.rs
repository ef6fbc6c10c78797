//! Use-case services over the record store.
//!
//! # Responsibility
//! - Combine shape validation and repository calls into note use-cases.
//! - Keep the HTTP layer free of storage details.

pub mod note_service;
