//! Endpoints.
//!
//! A [`Handler`] is the innermost link of the chain built in
//! [`Router::dispatch`](crate::Router::dispatch): the middleware layers run
//! first, then the matched endpoint (or the `404` / `405` fallback). Both
//! kinds of link resolve to the same [`BoxFuture`], so [`Next`] can hold
//! either behind an `Arc<dyn …>` without any adapter type.
//!
//! [`Next`]: crate::middleware::Next

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future every link in the chain returns.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Something that answers a request.
///
/// Implemented for any `Fn(Request) -> impl Future<Output = impl
/// IntoResponse>`, which covers plain `async fn` items and closures holding
/// an `Arc` to a controller.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> BoxFuture {
        let pending = self(req);
        Box::pin(async move { pending.await.into_response() })
    }
}

pub(crate) type BoxedHandler = Arc<dyn Handler>;
