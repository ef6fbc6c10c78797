//! Error-to-response mapping for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use notes_core::db::DbError;
use notes_core::{NoteServiceError, RepoError, ValidationErrors};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;

/// Everything a handler can fail with, already classified by status.
#[derive(Debug)]
pub enum ApiError {
    /// 404 with an empty body.
    NotFound,
    /// 400 with the field-keyed error object.
    Invalid(ValidationErrors),
    /// 400 with `{"detail": ...}`.
    MalformedJson(String),
    /// 500; the message is logged, not returned.
    Internal(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::Invalid(errors) => write!(f, "invalid payload: {errors}"),
            Self::MalformedJson(detail) => f.write_str(detail),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<NoteServiceError> for ApiError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NoteNotFound(_) => Self::NotFound,
            NoteServiceError::Invalid(errors) => Self::Invalid(errors),
            NoteServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        NoteServiceError::from(value).into()
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<JoinError> for ApiError {
    fn from(value: JoinError) -> Self {
        Self::Internal(format!("store task failed: {value}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Invalid(errors) => {
                debug!("event=payload_rejected module=api status=invalid fields={errors}");
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            Self::MalformedJson(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            Self::Internal(message) => {
                error!("event=store_error module=api status=error error={message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
