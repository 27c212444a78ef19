//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The middleware chain
//! wraps the lookup result, including the `404` / `405` fallbacks, so layers
//! see every request.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] / [`Router::layer`] call returns `self` so
/// registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    layers: Arc<[BoxedMiddleware]>,
    not_found: BoxedHandler,
    method_not_allowed: BoxedHandler,
}

enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            layers: Vec::new().into(),
            not_found: Arc::new(not_found),
            method_not_allowed: Arc::new(method_not_allowed),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid pattern or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error rather than a runtime condition.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::new(handler) as BoxedHandler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware layer. The first layer added is the outermost.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        let mut layers = self.layers.to_vec();
        layers.push(Arc::new(middleware));
        self.layers = layers.into();
        self
    }

    /// Routes one request through the middleware chain and its handler.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let endpoint = match self.lookup(req.method, &req.path) {
            Lookup::Found(handler, params) => {
                req.params = params;
                handler
            }
            Lookup::MethodNotAllowed => Arc::clone(&self.method_not_allowed),
            Lookup::NotFound => Arc::clone(&self.not_found),
        };

        Next::new(Arc::clone(&self.layers), endpoint).run(req).await
    }

    fn lookup(&self, method: Method, path: &str) -> Lookup {
        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(Arc::clone(matched.value), params);
        }

        let elsewhere = self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok());
        if elsewhere { Lookup::MethodNotAllowed } else { Lookup::NotFound }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

async fn not_found(_req: Request) -> Response {
    Response::status(Status::NotFound)
}

async fn method_not_allowed(_req: Request) -> Response {
    Response::status(Status::MethodNotAllowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    async fn echo_id(req: Request) -> Response {
        let id = req.param("id").unwrap_or_default();
        Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
    }

    #[tokio::test]
    async fn extracts_path_parameter() {
        let app = Router::new().on(Method::Get, "/users/{id}", echo_id);

        let res = app.dispatch(Request::new(Method::Get, "/users/42")).await;

        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), br#"{"id":"42"}"#);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let app = Router::new().on(Method::Get, "/users/{id}", echo_id);

        let res = app.dispatch(Request::new(Method::Get, "/nope")).await;

        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn known_path_with_other_method_is_405() {
        let app = Router::new().on(Method::Get, "/users/{id}", echo_id);

        let res = app.dispatch(Request::new(Method::Patch, "/users/1")).await;

        assert_eq!(res.status_code(), 405);
    }

    #[tokio::test]
    async fn closures_returning_any_response_type_are_handlers() {
        let created = Arc::new(Status::Created);
        let app = Router::new().on(Method::Post, "/users", move |_req: Request| {
            let status = *created;
            async move { status }
        });

        let res = app.dispatch(Request::new(Method::Post, "/users")).await;

        assert_eq!(res.status_code(), 201);
    }

    #[tokio::test]
    async fn layers_run_outermost_first() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let tag = |name: &'static str| {
            let seen = Arc::clone(&seen);
            move |req: Request, next: Next| {
                seen.lock().unwrap().push(name);
                next.run(req)
            }
        };

        let app = Router::new()
            .layer(tag("outer"))
            .layer(tag("inner"))
            .on(Method::Get, "/users/{id}", echo_id);
        app.dispatch(Request::new(Method::Get, "/nope")).await;

        assert_eq!(*seen.lock().unwrap(), ["outer", "inner"]);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new()
            .on(Method::Get, "/users/{id}", echo_id)
            .on(Method::Get, "/users/{key}", echo_id);
    }
}
