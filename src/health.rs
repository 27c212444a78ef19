//! Health check.
//!
//! `GET /ping` answers `{"status":"pong"}` whenever the process can serve
//! HTTP at all. It deliberately does not touch the store, so a slow database
//! never gets the pod restarted.

use serde::Serialize;

use crate::request::Request;
use crate::response::Json;

#[derive(Debug, Serialize)]
pub struct Pong {
    pub status: &'static str,
}

/// Liveness handler for `GET /ping`.
pub async fn ping(_req: Request) -> Json<Pong> {
    Json(Pong { status: "pong" })
}
