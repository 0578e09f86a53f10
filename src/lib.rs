//! # inertia
//!
//! The server half of the Inertia protocol: a request either gets a full HTML
//! shell or a JSON *page* naming the client-side component to render and the
//! props to render it with.
//!
//! ## The contract
//!
//! - **Props** are composed from shared props (registered once on the engine)
//!   and per-request props, right-biased and recursive for nested maps.
//! - **Partial reloads** (`x-inertia-partial-component` naming the rendered
//!   component, `x-inertia-partial-data` listing keys) send only the listed
//!   props.
//! - **Lazy props** are evaluated at render time, after the partial filter:
//!   a lazy prop the client did not ask for is never called.
//! - **Versioning**: a protocol GET carrying a stale `x-inertia-version` gets
//!   `409` plus `x-inertia-location` and the client hard-reloads.
//! - **Redirects**: `302` answering PUT/PATCH/DELETE goes out as `303`.
//!
//! Routing, templates and the client are somebody else's job. The engine
//! reads requests through [`RequestContext`], so any `http`-based framework
//! can drive it; [`Server`] is a small hyper binding for apps that want one.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inertia::{HtmlShell, Inertia, IntoResponse, PropValue, Props, Request, Response, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Inertia::new(HtmlShell::new(
//!         r#"<!doctype html><html><body>@inertia<script src="/app.js"></script></body></html>"#,
//!     ))
//!     .with_version("1");
//!     engine.share("app", Props::new().with("name", "demo"));
//!
//!     let app = middleware::inertia(Arc::new(engine), events);
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn events(req: Request) -> Response {
//!     let props = Props::new()
//!         .with("title", "Events")
//!         .with("stats", PropValue::lazy(|| 42));
//!     inertia::render(&req, "Events/Index", props).into_response()
//! }
//! ```

mod engine;
mod error;
mod handler;
mod page;
mod props;
mod request;
mod resolve;
mod response;
mod server;
mod shared;
mod shell;

pub mod headers;
pub mod middleware;

pub use engine::{Inertia, Version, is_inertia_request, render};
pub use error::{BoxError, Error};
pub use handler::Handler;
pub use page::{Page, escape_html};
pub use props::{Lazy, PropValue, Props};
pub use request::{Request, RequestContext};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::Server;
pub use shared::SharedProps;
pub use shell::{HtmlShell, RootTemplate};
