//! Prop resolution: compose, filter, evaluate.
//!
//! ```text
//! shared snapshot ─┐
//!                  ├─ merge ─→ partial-reload filter ─→ lazy evaluation ─→ JSON map
//! request props ───┘
//! ```
//!
//! Evaluation runs strictly after filtering: a lazy prop the client did not
//! ask for is never called.

use http::HeaderMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::headers::{X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA};
use crate::props::{PropValue, Props};
use crate::request::RequestContext;

/// Produces the concrete props of one page render.
///
/// `headers` collects whatever exchange lazies write; the caller copies them
/// onto the response.
pub(crate) fn resolve(
    shared: &Props,
    props: Props,
    component: &str,
    req: &dyn RequestContext,
    headers: &mut HeaderMap,
) -> Result<Map<String, Value>, Error> {
    let mut composed = shared.clone();
    composed.merge(props);

    if let Some(only) = partial_keys(req, component) {
        debug!(component, only = ?only, "partial reload");
        composed.retain_keys(only);
    }

    evaluate(composed, req, headers)
}

/// The requested key list, when the partial reload targets `component`.
///
/// A reload aimed at another component yields `None`: the full prop set goes
/// out. A matching reload with no key list selects nothing.
fn partial_keys<'r>(req: &'r dyn RequestContext, component: &str) -> Option<Vec<&'r str>> {
    if req.header(X_INERTIA_PARTIAL_COMPONENT)? != component {
        return None;
    }
    let only = req.header(X_INERTIA_PARTIAL_DATA).unwrap_or_default();
    Some(only.split(',').map(str::trim).filter(|k| !k.is_empty()).collect())
}

fn evaluate(
    props: Props,
    req: &dyn RequestContext,
    headers: &mut HeaderMap,
) -> Result<Map<String, Value>, Error> {
    let mut out = Map::new();
    for (key, value) in props {
        let value = match value {
            PropValue::Value(v) => v,
            PropValue::Map(nested) => Value::Object(evaluate(nested, req, headers)?),
            PropValue::Lazy(lazy) => match lazy.call(req, headers) {
                Ok(v) => v,
                Err(source) => return Err(Error::Resolver { key, source }),
            },
        };
        out.insert(key, value);
    }
    Ok(out)
}
