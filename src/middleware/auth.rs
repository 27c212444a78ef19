//! Authentication placeholder.
//!
//! Every route is public today. The layer is wired in so a token check can
//! be added in one place; until then it records whether a bearer token was
//! presented and calls through.

use std::sync::Arc;

use tracing::debug;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Pass-through authentication layer.
pub struct Auth {
    secret: Option<Arc<str>>,
}

/// Auth layer keyed by `jwt_secret`. Never rejects a request.
pub fn auth(jwt_secret: Option<String>) -> Auth {
    Auth { secret: jwt_secret.map(Arc::from) }
}

impl Middleware for Auth {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let bearer = req
            .header("authorization")
            .and_then(|v| v.get(..7))
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("bearer "));
        debug!(bearer, secret_configured = self.secret.is_some(), "auth pass-through");
        Box::pin(next.run(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::response::Response;
    use crate::router::Router;

    async fn ok(_req: Request) -> Response {
        Response::json(b"{}".to_vec())
    }

    #[tokio::test]
    async fn calls_through_with_or_without_token() {
        let app = Router::new()
            .layer(auth(Some("s3cret".to_owned())))
            .on(Method::Get, "/ping", ok);

        let anonymous = app.dispatch(Request::new(Method::Get, "/ping")).await;
        let bearer = app
            .dispatch(Request::new(Method::Get, "/ping").with_header("Authorization", "Bearer abc"))
            .await;

        assert_eq!(anonymous.status_code(), 200);
        assert_eq!(bearer.status_code(), 200);
    }
}
