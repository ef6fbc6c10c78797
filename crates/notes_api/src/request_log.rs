//! One access-log line per request.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

pub(crate) async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let line = format!(
        "event=http_request module=api status={} method={method} path={path} duration_ms={}",
        status.as_u16(),
        started_at.elapsed().as_millis()
    );
    if status.is_server_error() {
        warn!("{line}");
    } else {
        info!("{line}");
    }

    response
}
