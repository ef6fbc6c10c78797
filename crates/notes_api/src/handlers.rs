//! Collection and item handlers for `/api/notes/`.
//!
//! # Invariants
//! - An id that is not a plain non-negative integer is 404, like an unknown id.
//! - On the item routes the lookup decides 404 before the body is looked at.

use crate::error::ApiError;
use crate::store::NoteStore;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use notes_core::{Note, NoteId};
use serde_json::{Map, Value};

/// `GET /api/notes/`
pub(crate) async fn list_notes(
    State(store): State<NoteStore>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = store
        .with_service(|service| Ok(service.list_notes()?))
        .await?;
    Ok(Json(notes))
}

/// `POST /api/notes/`
pub(crate) async fn create_note(
    State(store): State<NoteStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let payload = parse_payload(&body)?;
    let note = store
        .with_service(move |service| Ok(service.create_note(&payload)?))
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `GET /api/notes/{id}/`
pub(crate) async fn retrieve_note(
    State(store): State<NoteStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&raw_id)?;
    let note = store
        .with_service(move |service| Ok(service.get_note(id)?))
        .await?;
    Ok(Json(note))
}

/// `PUT /api/notes/{id}/`
pub(crate) async fn update_note(
    State(store): State<NoteStore>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&raw_id)?;
    let payload = parse_payload(&body);
    let note = store
        .with_service(move |service| match payload {
            Ok(payload) => Ok(service.update_note(id, &payload)?),
            Err(malformed) => {
                // A broken body only matters once the note is known to exist.
                service.get_note(id)?;
                Err(malformed)
            }
        })
        .await?;
    Ok(Json(note))
}

/// `DELETE /api/notes/{id}/`
pub(crate) async fn delete_note(
    State(store): State<NoteStore>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_note_id(&raw_id)?;
    store
        .with_service(move |service| Ok(service.delete_note(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_note_id(raw: &str) -> Result<NoteId, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::NotFound);
    }
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Empty bodies read as `{}` so they fail field validation, not parsing.
fn parse_payload(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::MalformedJson(format!("JSON parse error - {err}")))
}
