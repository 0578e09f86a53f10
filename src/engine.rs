//! The protocol engine: configuration plus the render entry point.
//!
//! # Render pipeline
//!
//! ```text
//! Inertia::render(req, component, props)
//!   → resolve   shared ⊕ props, partial-reload filter, lazy evaluation
//!   → Page      {component, props, url, version} → JSON bytes
//!   → emit      x-inertia request? JSON body : root HTML shell
//! ```
//!
//! Everything runs synchronously on the task handling the request. Lazy props
//! that block, block that task; the engine adds no timeout of its own.

use std::fmt;
use std::sync::Arc;

use http::header::VARY;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::headers::X_INERTIA;
use crate::page::{Page, escape_html};
use crate::props::{PropValue, Props};
use crate::request::{Request, RequestContext};
use crate::resolve::resolve;
use crate::response::Response;
use crate::shared::SharedProps;
use crate::shell::RootTemplate;

/// Where the current asset version comes from.
#[derive(Clone)]
pub enum Version {
    Static(String),
    /// Called on every render and every version check.
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Version {
    pub fn current(&self) -> String {
        match self {
            Self::Static(v) => v.clone(),
            Self::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => write!(f, "Static({v:?})"),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Engine configuration, built once at startup and shared by every request.
///
/// ```rust
/// use std::sync::Arc;
/// use inertia::{HtmlShell, Inertia, Props};
///
/// let inertia = Inertia::new(HtmlShell::new("<!doctype html><body>@inertia</body>"))
///     .with_version("2024-05-01");
/// inertia.share("app", Props::new().with("name", "demo"));
///
/// let inertia = Arc::new(inertia);
/// ```
pub struct Inertia {
    root: Box<dyn RootTemplate>,
    root_data: Map<String, Value>,
    version: Version,
    shared: SharedProps,
}

impl Inertia {
    /// An engine rendering full page loads through `root`. Version defaults
    /// to the empty string.
    pub fn new(root: impl RootTemplate) -> Self {
        Self {
            root: Box::new(root),
            root_data: Map::new(),
            version: Version::Static(String::new()),
            shared: SharedProps::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Version::Static(version.into());
        self
    }

    /// Computes the version on demand, e.g. from a build manifest hash.
    pub fn with_version_fn(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.version = Version::Dynamic(Arc::new(f));
        self
    }

    /// Top-level data handed to the root template on every HTML render.
    pub fn with_root_data(mut self, data: Map<String, Value>) -> Self {
        self.root_data = data;
        self
    }

    pub fn share(&self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.shared.share(key, value);
    }

    pub fn share_multi(&self, props: Props) {
        self.shared.share_multi(props);
    }

    pub fn shared(&self) -> &SharedProps { &self.shared }

    pub fn version(&self) -> String {
        self.version.current()
    }

    /// Renders `component` with `props` for `req`.
    ///
    /// Protocol requests get the page as JSON; anything else gets the root
    /// shell with the page embedded. Serialization and template failures,
    /// and any error from a lazy prop, are returned unchanged; converting the
    /// result with [`IntoResponse`](crate::IntoResponse) maps them to `500`.
    pub fn render(
        &self,
        req: &dyn RequestContext,
        component: &str,
        props: Props,
    ) -> Result<Response, Error> {
        let mut extra = http::HeaderMap::new();
        let props = resolve(&self.shared.snapshot(), props, component, req, &mut extra)?;

        let page = Page {
            component: component.to_owned(),
            props,
            url: req.request_uri().to_owned(),
            version: self.version(),
        };

        if is_inertia_request(req) {
            debug!(component, url = %page.url, "rendering page as json");
            let payload = page.to_json()?;
            return Ok(Response::builder()
                .headers(extra)
                .header(VARY, "Accept")
                .header(X_INERTIA, "true")
                .json(payload));
        }

        debug!(component, url = %page.url, "rendering root shell");
        let escaped = escape_html(&page.to_json_string()?);
        let html = self.root.render(&escaped, &self.root_data).map_err(Error::Template)?;
        Ok(Response::builder().headers(extra).html(html))
    }
}

impl fmt::Debug for Inertia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inertia")
            .field("version", &self.version)
            .field("root_data", &self.root_data)
            .finish_non_exhaustive()
    }
}

/// True when the request carries a non-empty `x-inertia` marker.
pub fn is_inertia_request<R: RequestContext + ?Sized>(req: &R) -> bool {
    req.header(X_INERTIA).is_some_and(|v| !v.is_empty())
}

/// Renders through the engine the [`middleware::inertia`] stack installed on
/// the request.
///
/// [`middleware::inertia`]: crate::middleware::inertia
pub fn render(req: &Request, component: &str, props: Props) -> Result<Response, Error> {
    req.extensions()
        .get::<Arc<Inertia>>()
        .ok_or(Error::MissingEngine)?
        .render(req, component, props)
}
