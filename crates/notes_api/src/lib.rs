//! HTTP JSON surface of the notes service.
//!
//! # Responsibility
//! - Map `(method, path)` pairs to note handlers.
//! - Translate service results into status codes and JSON bodies.
//!
//! # Invariants
//! - Handlers share no mutable state; each request opens its own store
//!   connection through `NoteStore`.
//!
//! Route table:
//!
//! | Method | Path               | Handler          |
//! |--------|--------------------|------------------|
//! | GET    | `/api/notes/`      | `list_notes`     |
//! | POST   | `/api/notes/`      | `create_note`    |
//! | GET    | `/api/notes/{id}/` | `retrieve_note`  |
//! | PUT    | `/api/notes/{id}/` | `update_note`    |
//! | DELETE | `/api/notes/{id}/` | `delete_note`    |

mod error;
mod handlers;
mod request_log;
mod store;

pub use error::ApiError;
pub use store::NoteStore;

use axum::routing::get;
use axum::{middleware, Router};
use std::future::Future;
use tokio::net::TcpListener;

pub const NOTES_COLLECTION_PATH: &str = "/api/notes/";
pub const NOTES_ITEM_PATH: &str = "/api/notes/{id}/";

/// Builds the application router over `store`.
pub fn router(store: NoteStore) -> Router {
    Router::new()
        .route(
            NOTES_COLLECTION_PATH,
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            NOTES_ITEM_PATH,
            get(handlers::retrieve_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .layer(middleware::from_fn(request_log::log_request))
        .with_state(store)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    store: NoteStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
