//! The application's route table.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/ping` | [`health::ping`] |
//! | GET | `/users` | [`UserController::list`] |
//! | GET | `/users/{id}` | [`UserController::get`] |
//! | POST | `/users` | [`UserController::create`] |
//! | PUT | `/users/{id}` | [`UserController::update`] |
//! | DELETE | `/users/{id}` | [`UserController::delete`] |
//!
//! Every request passes trace → CORS → auth before reaching its handler.

use std::sync::Arc;

use crate::config::Config;
use crate::health;
use crate::method::Method;
use crate::middleware;
use crate::request::Request;
use crate::router::Router;
use crate::users::{UserController, UserStore};

/// Adapts a controller method to a route handler.
macro_rules! handle {
    ($ctrl:expr, $op:ident) => {{
        let ctrl = Arc::clone(&$ctrl);
        move |req: Request| {
            let ctrl = Arc::clone(&ctrl);
            async move { ctrl.$op(req).await }
        }
    }};
}

/// Builds the router over `store`.
pub fn app<S: UserStore + 'static>(store: Arc<S>, config: &Config) -> Router {
    let users = Arc::new(UserController::new(store));

    Router::new()
        .layer(middleware::trace())
        .layer(middleware::cors(config.cors.clone()))
        .layer(middleware::auth(config.jwt_secret.clone()))
        .on(Method::Get,    "/ping",       health::ping)
        .on(Method::Get,    "/users",      handle!(users, list))
        .on(Method::Get,    "/users/{id}", handle!(users, get))
        .on(Method::Post,   "/users",      handle!(users, create))
        .on(Method::Put,    "/users/{id}", handle!(users, update))
        .on(Method::Delete, "/users/{id}", handle!(users, delete))
}
