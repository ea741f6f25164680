//! Ready-made handlers meant for [`Router::mount`](crate::Router::mount).
//!
//! A mounted handler is an ordinary handler that calls [`Context::next`]
//! somewhere in its body. Code before the call sees the request first; code
//! after it sees the response once every downstream handler has returned.
//!
//! - [`trace`] — one `info` event per request with method, path, status, latency

use std::time::Instant;

use tracing::info;

use crate::context::Context;
use crate::request::Request;
use crate::response::Response;

/// Logs every request that passes through it.
///
/// Mount it first so the measured latency covers the whole chain:
///
/// ```rust,no_run
/// use switchyard::{middleware, Router};
///
/// let app = Router::new().mount("/", middleware::trace);
/// ```
///
/// Requests aborted with [`Context::fail`] are still logged, with the status
/// the error responder set and `aborted = true`.
pub fn trace(ctx: &mut Context, req: &Request, res: &mut Response) {
    let start = Instant::now();

    ctx.next(req, res);

    info!(
        method = req.method_str(),
        path = req.path(),
        status = res.status(),
        aborted = ctx.is_aborted(),
        latency = ?start.elapsed(),
        "request",
    );
}
