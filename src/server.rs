//! Hyper binding and graceful shutdown.
//!
//! The engine itself never touches hyper; this module is the thin adapter
//! that turns hyper requests into [`Request`]s, runs one application
//! [`Handler`] (usually the [`middleware::inertia`](crate::middleware::inertia)
//! stack) and writes the resulting [`Response`] back.
//!
//! # Shutdown
//!
//! On SIGTERM or Ctrl-C the server stops accepting connections, lets every
//! in-flight connection finish, then returns from [`Server::serve`].

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

pub struct Server {
    addr: String,
}

impl Server {
    /// Configures the listen address, `host:port`. Parsed when
    /// [`serve`](Server::serve) starts.
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Accepts connections and dispatches every request to `app`.
    ///
    /// Returns after a graceful shutdown, or immediately if the address is
    /// invalid or cannot be bound.
    pub async fn serve(self, app: impl Handler) -> Result<(), Error> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|source| Error::Address { addr: self.addr.clone(), source })?;
        let listener = TcpListener::bind(addr).await?;
        let app = app.into_boxed_handler();

        info!(%addr, "inertia listening");

        let mut tasks = tokio::task::JoinSet::new();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let app = Arc::clone(&app);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| dispatch(Arc::clone(&app), req));
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer, "connection error: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("inertia stopped");
        Ok(())
    }
}

/// Buffers the body, runs the handler. Never fails: an unreadable body is a 400.
async fn dispatch(
    app: BoxedHandler,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let uri = parts.uri.clone();

    let response = match body.collect().await {
        Ok(collected) => app.call(Request::new(parts, collected.to_bytes())).await,
        Err(e) => {
            warn!(%method, %uri, "failed to read request body: {e}");
            Response::status(StatusCode::BAD_REQUEST)
        }
    };

    debug!(%method, %uri, status = response.status_code().as_u16(), "request handled");
    Ok(response.into_inner())
}

/// Resolves on SIGTERM or Ctrl-C. A signal that cannot be installed is logged
/// and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
