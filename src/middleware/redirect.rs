//! `302 Found` → `303 See Other` for PUT, PATCH and DELETE.
//!
//! Clients may replay a 302 redirect with the original method, so a form
//! submitted with `PUT` would be re-sent as `PUT` to the redirect target.
//! A 303 forces the follow-up to be a GET. Every other status, and every
//! 302 answering some other method, is written unchanged.

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::debug;

use crate::handler::Handler;
use crate::request::Request;

/// The status that should go on the wire for `status` answering `method`.
pub fn see_other(method: &Method, status: StatusCode) -> StatusCode {
    if status == StatusCode::FOUND
        && matches!(*method, Method::PUT | Method::PATCH | Method::DELETE)
    {
        return StatusCode::SEE_OTHER;
    }
    status
}

/// Wraps `next` so its redirects follow [`see_other`].
pub fn redirect_status(next: impl Handler) -> impl Handler {
    let next = next.into_boxed_handler();
    move |req: Request| {
        let next = Arc::clone(&next);
        let method = req.method().clone();
        async move {
            let mut res = next.call(req).await;
            let status = see_other(&method, res.status_code());
            if status != res.status_code() {
                debug!(%method, "rewriting 302 to 303");
                res.set_status(status);
            }
            res
        }
    }
}
