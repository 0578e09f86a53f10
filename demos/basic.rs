//! Minimal inertia app: one handler, shared props, a lazy prop, a redirect.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/events
//!   curl -H 'x-inertia: true' -H 'x-inertia-version: 1' http://localhost:3000/events
//!   curl -H 'x-inertia: true' -H 'x-inertia-version: 0' -i http://localhost:3000/events
//!   curl -H 'x-inertia: true' -H 'x-inertia-version: 1' \
//!        -H 'x-inertia-partial-component: Events/Index' \
//!        -H 'x-inertia-partial-data: stats' http://localhost:3000/events
//!   curl -X PUT -i http://localhost:3000/events/7

use std::sync::Arc;

use http::{Method, StatusCode};
use inertia::{HtmlShell, Inertia, IntoResponse, PropValue, Props, Request, Response, Server, middleware};
use serde_json::{Map, Value, json};

const SHELL: &str = r#"<!doctype html>
<html>
  <head><title>{{ title }}</title></head>
  <body>
    @inertia
    <script type="module" src="/assets/app.js"></script>
  </body>
</html>"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut root_data = Map::new();
    root_data.insert("title".to_owned(), Value::from("inertia demo"));

    let engine = Inertia::new(HtmlShell::new(SHELL))
        .with_version("1")
        .with_root_data(root_data);
    engine.share("app", Props::new().with("name", "demo"));
    engine.share(
        "locale",
        PropValue::lazy_with_request(|req| req.header("accept-language").unwrap_or("en").to_owned()),
    );

    let app = middleware::inertia(Arc::new(engine), app);

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(app).await {
        eprintln!("server error: {e}");
    }
}

// Routing is the application's business; a match is enough here.
async fn app(req: Request) -> Response {
    match (req.method().clone(), req.path()) {
        (Method::GET, "/events") => events(&req),
        (Method::PUT, path) if path.starts_with("/events/") => {
            // Rewritten to 303 by the middleware, so the client follows with GET.
            Response::builder()
                .status(StatusCode::FOUND)
                .header("location", "/events")
                .no_body()
        }
        _ => Response::status(StatusCode::NOT_FOUND),
    }
}

fn events(req: &Request) -> Response {
    let props = Props::new()
        .with("events", json!([{"id": 7, "title": "Launch"}]))
        .with("stats", PropValue::lazy(|| json!({"attending": 120})));
    inertia::render(req, "Events/Index", props).into_response()
}
