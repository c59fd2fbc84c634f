//! Per-request access log.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed();
    if status.is_server_error() {
        log::warn!("{method} {path} {} {elapsed:.2?}", status.as_u16());
    } else {
        log::info!("{method} {path} {} {elapsed:.2?}", status.as_u16());
    }
    response
}
