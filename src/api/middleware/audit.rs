//! Access logging middleware.
//!
//! Logs every API request with method, path, response status and
//! elapsed time.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log API access for audit trail.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "API request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "API request");
    }

    response
}
