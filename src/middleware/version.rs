//! Asset version negotiation.
//!
//! A protocol client sends the asset version it was built against. When that
//! differs from the server's on a GET, the page would be rendered by a stale
//! bundle, so the guard answers `409 Conflict` with `x-inertia-location` set
//! to the request URI and the client performs a full reload of that URI.
//!
//! Conventional browser navigations (no `x-inertia` marker) skip the guard
//! entirely. Non-GET requests are never checked.

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::debug;

use crate::engine::{Inertia, is_inertia_request};
use crate::handler::Handler;
use crate::headers::{X_INERTIA_LOCATION, X_INERTIA_VERSION};
use crate::request::{Request, RequestContext};
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct VersionGuard {
    inertia: Arc<Inertia>,
}

impl VersionGuard {
    pub fn new(inertia: Arc<Inertia>) -> Self {
        Self { inertia }
    }

    /// `Some(409)` when the request must not reach the handler.
    pub fn check<R: RequestContext + ?Sized>(&self, req: &R) -> Option<Response> {
        if !is_inertia_request(req) || *req.method() != Method::GET {
            return None;
        }

        let client = req.header(X_INERTIA_VERSION).unwrap_or_default();
        let server = self.inertia.version();
        if client == server {
            return None;
        }

        debug!(client, server = %server, uri = req.request_uri(), "asset version mismatch");
        Some(
            Response::builder()
                .status(StatusCode::CONFLICT)
                .header(X_INERTIA_LOCATION, req.request_uri())
                .no_body(),
        )
    }
}

/// Wraps `next` so stale protocol GETs are answered with `409` before it runs.
pub fn version_guard(inertia: Arc<Inertia>, next: impl Handler) -> impl Handler {
    let guard = Arc::new(VersionGuard::new(inertia));
    let next = next.into_boxed_handler();
    move |req: Request| {
        let guard = Arc::clone(&guard);
        let next = Arc::clone(&next);
        async move {
            match guard.check(&req) {
                Some(conflict) => conflict,
                None => next.call(req).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::shell::HtmlShell;

    fn guard() -> VersionGuard {
        VersionGuard::new(Arc::new(Inertia::new(HtmlShell::new("@inertia")).with_version("v2")))
    }

    fn request(method: Method, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().method(method).uri("/events?page=3");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Bytes::new()).unwrap().into()
    }

    #[test]
    fn stale_get_gets_conflict_with_location() {
        let req = request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v1")]);

        let res = guard().check(&req).unwrap();

        assert_eq!(res.status_code(), StatusCode::CONFLICT);
        assert_eq!(res.header("x-inertia-location"), Some("/events?page=3"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn missing_version_header_counts_as_mismatch() {
        let req = request(Method::GET, &[("x-inertia", "true")]);
        assert!(guard().check(&req).is_some());
    }

    #[test]
    fn matching_version_passes() {
        let req = request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v2")]);
        assert!(guard().check(&req).is_none());
    }

    #[test]
    fn non_get_is_never_checked() {
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let req = request(method, &[("x-inertia", "true"), ("x-inertia-version", "v1")]);
            assert!(guard().check(&req).is_none());
        }
    }

    #[test]
    fn plain_browser_navigation_skips_guard() {
        let req = request(Method::GET, &[("x-inertia-version", "v1")]);
        assert!(guard().check(&req).is_none());
    }

    #[test]
    fn dynamic_version_is_read_per_check() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let deployed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&deployed);
        let inertia = Inertia::new(HtmlShell::new("@inertia")).with_version_fn(move || {
            if flag.load(Ordering::SeqCst) { "v2".to_owned() } else { "v1".to_owned() }
        });
        let guard = VersionGuard::new(Arc::new(inertia));
        let req = request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v1")]);

        assert!(guard.check(&req).is_none());
        deployed.store(true, Ordering::SeqCst);
        assert!(guard.check(&req).is_some());
    }

    #[tokio::test]
    async fn conflict_short_circuits_the_handler() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let inertia = Arc::new(Inertia::new(HtmlShell::new("@inertia")).with_version("v2"));
        let stack = version_guard(inertia, move |_req: Request| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::OK }
        })
        .into_boxed_handler();

        let stale = stack
            .call(request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v1")]))
            .await;
        let fresh = stack
            .call(request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v2")]))
            .await;

        assert_eq!(stale.status_code(), StatusCode::CONFLICT);
        assert_eq!(fresh.status_code(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
