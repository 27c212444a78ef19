//! Middleware layer.
//!
//! A middleware receives the request and a [`Next`] handle to the rest of the
//! chain. It may answer on its own (a CORS preflight), or call
//! [`Next::run`] and decorate what comes back.
//!
//! Layers run in registration order, the first registered being the
//! outermost. They wrap every request, matched or not, so a preflight for a
//! path with no `OPTIONS` route still reaches the CORS layer.
//!
//! Built-in middleware:
//! - [`trace`]: per-request span with method, path, status, latency
//! - [`cors`]: CORS policy, answering preflights
//! - [`auth`]: authentication placeholder, always calls through

pub mod auth;
pub mod cors;
pub mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::Response;

pub use auth::auth;
pub use cors::{CorsPolicy, cors};
pub use trace::trace;

/// A request interceptor.
///
/// Implemented for any `Fn(Request, Next) -> impl Future<Output = Response>`,
/// so most middleware is a factory function returning a closure.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(self(req, next))
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The remainder of the chain: the layers not yet run, then the endpoint.
pub struct Next {
    layers: Arc<[BoxedMiddleware]>,
    position: usize,
    endpoint: BoxedHandler,
}

impl Next {
    pub(crate) fn new(layers: Arc<[BoxedMiddleware]>, endpoint: BoxedHandler) -> Self {
        Self { layers, position: 0, endpoint }
    }

    /// Runs the next layer, or the endpoint once every layer has run.
    pub async fn run(self, req: Request) -> Response {
        let layer = self.layers.get(self.position).cloned();
        match layer {
            Some(layer) => {
                let next = Self { position: self.position + 1, ..self };
                layer.call(req, next).await
            }
            None => self.endpoint.call(req).await,
        }
    }
}
