//! # roster
//!
//! A small JSON CRUD service for user records, backed by SQLite.
//!
//! ## Layout
//!
//! - HTTP plumbing: [`Server`] (hyper, graceful shutdown), [`Router`]
//!   (matchit radix trees, one per method), [`middleware`] (trace, CORS,
//!   auth), [`Request`] / [`Response`].
//! - The user resource: [`users`], with the record and its validation rule,
//!   the [`UserStore`](users::UserStore) contract and its SQLite adapter, and
//!   the controller that maps store outcomes to status codes.
//! - Wiring: [`routes::app`] builds the route table, [`Config`] reads the
//!   environment.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use roster::users::SqliteUserStore;
//! use roster::{Config, Server, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roster::Error> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SqliteUserStore::open(&config.database)?);
//!
//!     Server::bind(config.addr)
//!         .serve(routes::app(store, &config))
//!         .await
//! }
//! ```
//!
//! Errors always come back as `{"error": "<message>"}`:
//!
//! ```text
//! GET /users/99   → 404 {"error":"User not found"}
//! POST /users {}  → 400 {"error":"name is required"}
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod health;
pub mod middleware;
pub mod routes;
pub mod users;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{ErrorBody, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
