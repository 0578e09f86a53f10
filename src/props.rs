//! Page props: a recursive string-keyed map with right-biased merge.
//!
//! A [`PropValue`] is one of three things:
//!
//! - a concrete JSON value,
//! - a nested [`Props`] map, which merges recursively,
//! - a [`Lazy`] resolver, evaluated at render time and only if the prop
//!   survives the partial-reload filter.
//!
//! ```rust
//! use inertia::{PropValue, Props};
//!
//! let props = Props::new()
//!     .with("user", Props::new().with("name", "alice"))
//!     .with("count", 3)
//!     .with("now", PropValue::lazy(|| "computed at render time"));
//! assert_eq!(props.len(), 3);
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use http::HeaderMap;
use serde_json::Value;

use crate::error::BoxError;
use crate::request::RequestContext;

type PlainFn = dyn Fn() -> Result<Value, BoxError> + Send + Sync;
type RequestFn = dyn Fn(&dyn RequestContext) -> Result<Value, BoxError> + Send + Sync;
type ExchangeFn = dyn Fn(&dyn RequestContext, &mut HeaderMap) -> Result<Value, BoxError> + Send + Sync;

// ── Lazy ──────────────────────────────────────────────────────────────────────

/// A deferred prop computation, tagged by the context it needs.
///
/// Cloning is one `Arc` increment, so a lazy registered once as a shared prop
/// is reused by every request.
#[derive(Clone)]
pub enum Lazy {
    /// Needs nothing.
    Plain(Arc<PlainFn>),
    /// Reads the request: headers, method, URI.
    Request(Arc<RequestFn>),
    /// Reads the request and may write response headers.
    Exchange(Arc<ExchangeFn>),
}

impl Lazy {
    pub(crate) fn call(
        &self,
        req: &dyn RequestContext,
        headers: &mut HeaderMap,
    ) -> Result<Value, BoxError> {
        match self {
            Self::Plain(f) => f(),
            Self::Request(f) => f(req),
            Self::Exchange(f) => f(req, headers),
        }
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Plain(_) => "plain",
            Self::Request(_) => "request",
            Self::Exchange(_) => "exchange",
        };
        write!(f, "Lazy({kind})")
    }
}

// ── PropValue ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum PropValue {
    Value(Value),
    Map(Props),
    Lazy(Lazy),
}

impl PropValue {
    /// A lazy prop computed with no context.
    pub fn lazy<F, T>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        Self::Lazy(Lazy::Plain(Arc::new(move || -> Result<Value, BoxError> { Ok(f().into()) })))
    }

    /// A lazy prop computed from the request.
    pub fn lazy_with_request<F, T>(f: F) -> Self
    where
        F: Fn(&dyn RequestContext) -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        Self::Lazy(Lazy::Request(Arc::new(
            move |req: &dyn RequestContext| -> Result<Value, BoxError> { Ok(f(req).into()) },
        )))
    }

    /// A lazy prop computed from the request that may also set response
    /// headers (cookies, cache hints).
    pub fn lazy_with_exchange<F, T>(f: F) -> Self
    where
        F: Fn(&dyn RequestContext, &mut HeaderMap) -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        Self::Lazy(Lazy::Exchange(Arc::new(
            move |req: &dyn RequestContext, headers: &mut HeaderMap| -> Result<Value, BoxError> {
                Ok(f(req, headers).into())
            },
        )))
    }

    /// A fallible lazy prop. Its error aborts the render and reaches the caller.
    pub fn try_lazy<F, T, E>(f: F) -> Self
    where
        F: Fn(&dyn RequestContext) -> Result<T, E> + Send + Sync + 'static,
        T: Into<Value>,
        E: Into<BoxError>,
    {
        Self::Lazy(Lazy::Request(Arc::new(move |req: &dyn RequestContext| -> Result<Value, BoxError> {
            f(req).map(Into::into).map_err(Into::into)
        })))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Props> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self { Self::Value(v) }
}

impl From<Props> for PropValue {
    fn from(p: Props) -> Self { Self::Map(p) }
}

impl From<Lazy> for PropValue {
    fn from(l: Lazy) -> Self { Self::Lazy(l) }
}

macro_rules! value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for PropValue {
                fn from(v: $t) -> Self { Self::Value(Value::from(v)) }
            }
        )*
    };
}

value_from!(&str, String, bool, i32, i64, u32, u64, f64);

// ── Props ─────────────────────────────────────────────────────────────────────

/// String-keyed prop map. Keys are unique; order carries no meaning.
#[derive(Clone, Debug, Default)]
pub struct Props(HashMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert and return `self`, for literal-style construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> { self.0.get(key) }
    pub fn remove(&mut self, key: &str) -> Option<PropValue> { self.0.remove(key) }
    pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Right-biased recursive merge of `incoming` into `self`.
    ///
    /// When both sides hold a [`Props`] map under the same key the maps merge
    /// key by key; any other collision is won by `incoming`, including a map
    /// replacing a scalar and the reverse. Keys only one side holds are kept.
    pub fn merge(&mut self, incoming: Props) {
        for (key, value) in incoming.0 {
            match self.0.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match value {
                    PropValue::Map(nested) if matches!(slot.get(), PropValue::Map(_)) => {
                        if let PropValue::Map(base) = slot.get_mut() {
                            base.merge(nested);
                        }
                    }
                    other => {
                        slot.insert(other);
                    }
                },
            }
        }
    }

    /// Keeps only the entries named in `keys`. Names with no entry are ignored.
    pub(crate) fn retain_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        let mut kept = HashMap::new();
        for key in keys {
            if let Some((k, v)) = self.0.remove_entry(key) {
                kept.insert(k, v);
            }
        }
        self.0 = kept;
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
