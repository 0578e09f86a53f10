//! Middleware layer.
//!
//! Each middleware takes a [`Handler`] and returns a new one. [`inertia`]
//! assembles the complete protocol stack around an application handler:
//!
//! ```text
//! request → redirect_status → install engine → version_guard → app
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inertia::{HtmlShell, Inertia, Props, Request, Server, middleware};
//!
//! async fn app(req: Request) -> inertia::Response {
//!     use inertia::IntoResponse;
//!     inertia::render(&req, "Home", Props::new().with("greeting", "hi")).into_response()
//! }
//!
//! # async fn run() -> Result<(), inertia::Error> {
//! let engine = Arc::new(Inertia::new(HtmlShell::new("@inertia")).with_version("1"));
//! Server::bind("0.0.0.0:3000").serve(middleware::inertia(engine, app)).await
//! # }
//! ```

use std::sync::Arc;

use crate::engine::Inertia;
use crate::handler::Handler;
use crate::request::Request;

pub mod redirect;
pub mod version;

pub use redirect::{redirect_status, see_other};
pub use version::{VersionGuard, version_guard};

/// The full protocol stack: engine lookup for [`render`](crate::render),
/// version negotiation, and redirect status normalization.
pub fn inertia(engine: Arc<Inertia>, app: impl Handler) -> impl Handler {
    redirect_status(install(Arc::clone(&engine), version_guard(engine, app)))
}

/// Stores the engine in the request extensions.
fn install(engine: Arc<Inertia>, next: impl Handler) -> impl Handler {
    let next = next.into_boxed_handler();
    move |mut req: Request| {
        req.extensions_mut().insert(Arc::clone(&engine));
        next.call(req)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use serde_json::Value;

    use super::*;
    use crate::props::Props;
    use crate::response::{IntoResponse, Response};
    use crate::shell::HtmlShell;

    async fn app(req: Request) -> Response {
        if *req.method() == Method::PUT {
            return Response::builder()
                .status(StatusCode::FOUND)
                .header("location", "/events")
                .no_body();
        }
        crate::render(&req, "Events", Props::new().with("count", 2)).into_response()
    }

    fn stack() -> crate::handler::BoxedHandler {
        let engine = Arc::new(Inertia::new(HtmlShell::new("<body>@inertia</body>")).with_version("v1"));
        inertia(engine, app).into_boxed_handler()
    }

    fn request(method: Method, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().method(method).uri("/events");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Bytes::new()).unwrap().into()
    }

    #[tokio::test]
    async fn protocol_request_renders_json_through_installed_engine() {
        let res = stack()
            .call(request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v1")]))
            .await;

        assert_eq!(res.status_code(), StatusCode::OK);
        let page: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(page["component"], "Events");
        assert_eq!(page["props"]["count"], 2);
    }

    #[tokio::test]
    async fn stale_version_never_reaches_app() {
        let res = stack()
            .call(request(Method::GET, &[("x-inertia", "true"), ("x-inertia-version", "v0")]))
            .await;

        assert_eq!(res.status_code(), StatusCode::CONFLICT);
        assert_eq!(res.header("x-inertia-location"), Some("/events"));
    }

    #[tokio::test]
    async fn put_redirect_is_see_other() {
        let res = stack().call(request(Method::PUT, &[("x-inertia", "true")])).await;
        assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn render_without_stack_is_a_server_error() {
        let res = app(request(Method::GET, &[("x-inertia", "true")])).await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
