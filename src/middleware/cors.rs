//! Cross-origin resource sharing.
//!
//! Two kinds of request reach this layer:
//!
//! - **Preflight**: `OPTIONS` carrying `Access-Control-Request-Method`. The
//!   layer answers it directly with `200` and never calls the rest of the
//!   chain, so no route has to be registered for `OPTIONS`.
//! - **Actual**: everything else. The inner response is decorated with the
//!   allow-origin family of headers when the origin and method pass the
//!   policy, and left alone otherwise.
//!
//! The browser enforces the outcome; a rejected preflight is still a `200`,
//! just one without the headers that would grant access.

use std::sync::Arc;

use tracing::debug;

use super::{Middleware, Next};
use crate::method::Method;
use crate::request::Request;
use crate::response::{Response, ResponseBuilder};
use crate::status::Status;

const WILDCARD: &str = "*";

/// Which cross-origin requests are allowed.
#[derive(Clone, Debug)]
pub struct CorsPolicy {
    /// Allowed origins; `"*"` allows any.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<Method>,
    /// Allowed request headers, compared case-insensitively; `"*"` allows any.
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: vec![WILDCARD.to_owned()],
            allowed_methods: vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Options,
            ],
            allowed_headers: ["Origin", "Content-Type", "Authorization", "Accept"]
                .map(str::to_owned)
                .to_vec(),
            exposed_headers: vec!["Content-Length".to_owned()],
            allow_credentials: true,
        }
    }
}

impl CorsPolicy {
    /// Replaces the allowed origins, keeping everything else.
    pub fn with_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// The `Access-Control-Allow-Origin` value granted to `origin`, if any.
    ///
    /// A listed origin is echoed back. The wildcard only ever yields `*`, which
    /// browsers refuse to pair with credentials.
    fn granted_origin<'a>(&self, origin: &'a str) -> Option<&'a str> {
        let listed = self.allowed_origins
            .iter()
            .any(|o| o != WILDCARD && o.eq_ignore_ascii_case(origin));
        if listed {
            Some(origin)
        } else if self.allowed_origins.iter().any(|o| o == WILDCARD) {
            Some(WILDCARD)
        } else {
            None
        }
    }

    fn grant(&self, res: ResponseBuilder, allowed: &str) -> ResponseBuilder {
        let res = res.header("access-control-allow-origin", allowed);
        if self.allow_credentials && allowed != WILDCARD {
            res.header("access-control-allow-credentials", "true")
        } else {
            res
        }
    }

    fn method_allowed(&self, method: &str) -> bool {
        self.allowed_methods
            .iter()
            .any(|m| m.as_str().eq_ignore_ascii_case(method))
    }

    fn headers_allowed(&self, requested: &[&str]) -> bool {
        requested.iter().all(|h| {
            self.allowed_headers
                .iter()
                .any(|a| a == WILDCARD || a.eq_ignore_ascii_case(h))
        })
    }

    fn preflight(&self, req: &Request) -> Response {
        let builder = Response::builder().status(Status::Ok).header(
            "vary",
            "Origin, Access-Control-Request-Method, Access-Control-Request-Headers",
        );

        let Some(origin) = req.header("origin") else {
            return builder.no_body();
        };
        let Some(allowed) = self.granted_origin(origin) else {
            debug!(origin, "preflight rejected: origin not allowed");
            return builder.no_body();
        };

        let method = req.header("access-control-request-method").unwrap_or_default();
        if !self.method_allowed(method) {
            debug!(origin, method, "preflight rejected: method not allowed");
            return builder.no_body();
        }

        let requested: Vec<&str> = req
            .header("access-control-request-headers")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .collect();
        if !self.headers_allowed(&requested) {
            debug!(origin, ?requested, "preflight rejected: headers not allowed");
            return builder.no_body();
        }

        let mut builder = self
            .grant(builder, allowed)
            .header("access-control-allow-methods", &method.to_ascii_uppercase());
        if !requested.is_empty() {
            builder = builder.header("access-control-allow-headers", &requested.join(", "));
        }
        builder.no_body()
    }

    fn decorate(&self, res: &mut Response, origin: &str, method: Method) {
        res.append_header("vary", "Origin");
        let Some(allowed) = self.granted_origin(origin) else {
            return;
        };
        if !self.method_allowed(method.as_str()) {
            return;
        }

        res.append_header("access-control-allow-origin", allowed);
        if self.allow_credentials && allowed != WILDCARD {
            res.append_header("access-control-allow-credentials", "true");
        }
        if !self.exposed_headers.is_empty() {
            res.append_header("access-control-expose-headers", &self.exposed_headers.join(", "));
        }
    }

    async fn handle(&self, req: Request, next: Next) -> Response {
        let is_preflight = req.method() == Method::Options
            && req.header("access-control-request-method").is_some();
        if is_preflight {
            return self.preflight(&req);
        }

        let origin = req.header("origin").map(str::to_owned);
        let method = req.method();
        let mut res = next.run(req).await;
        if let Some(origin) = origin {
            self.decorate(&mut res, &origin, method);
        }
        res
    }
}

/// CORS layer enforcing `policy`.
pub fn cors(policy: CorsPolicy) -> impl Middleware {
    let policy = Arc::new(policy);
    move |req: Request, next: Next| {
        let policy = Arc::clone(&policy);
        async move { policy.handle(req, next).await }
    }
}
