//! Unified error type.

use std::net::AddrParseError;

use http::StatusCode;
use tracing::error;

use crate::response::{IntoResponse, Response};

/// Boxed error returned by application callbacks: lazy props and root templates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by the crate's fallible operations.
///
/// A version mismatch is not an `Error`: it is a protocol signal and surfaces
/// as a `409` [`Response`] from the version guard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    /// The page envelope could not be serialized.
    #[error("failed to serialize page: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The root template failed to produce the HTML shell.
    #[error("root template failed: {0}")]
    Template(#[source] BoxError),

    /// A lazy prop returned an error. Application error, never swallowed.
    #[error("lazy prop `{key}` failed: {source}")]
    Resolver {
        key: String,
        #[source]
        source: BoxError,
    },

    /// [`render`](crate::render) was called on a request the middleware never saw.
    #[error("no inertia engine installed on the request; wrap the handler with middleware::inertia")]
    MissingEngine,
}

/// Every render failure is a server fault: `500`, empty body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!(error = %self, "render failed");
        Response::status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
