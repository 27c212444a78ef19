//! Per-request tracing span.

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{Middleware, Next};
use crate::request::Request;

/// Wraps each request in an `http.request` span and logs the outcome.
pub fn trace() -> impl Middleware {
    |req: Request, next: Next| async move {
        let span = info_span!("http.request", method = %req.method(), path = %req.path());
        let start = Instant::now();

        let res = next.run(req).instrument(span.clone()).await;

        span.in_scope(|| {
            info!(status = res.status_code(), elapsed = ?start.elapsed(), "request completed");
        });
        res
    }
}
