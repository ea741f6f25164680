//! Per-request chain executor.
//!
//! A [`Context`] is created for every matched request and handed, by mutable
//! reference, to each handler in turn. It owns the cursor into the route's
//! handler chain, the captured path parameters, the abort flag set by
//! [`Context::fail`], and a lazily-created [`Store`].
//!
//! ```text
//!   trace ─┬─ next ─▶ load_user ─┬─ next ─▶ show_user
//!          │                     │            (writes body)
//!          │                     ◀────────────┘
//!          ◀─────────────────────┘
//!   (logs latency)
//! ```
//!
//! There is no suspension point: `next` is a plain call that returns once the
//! rest of the chain has returned.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::handler::{BoxedHandler, ErrorHandler};
use crate::pattern::Params;
use crate::request::Request;
use crate::response::Response;
use crate::store::Store;

/// State of one in-flight request's handler chain.
///
/// Never shared between requests. Dropped by the router when the chain
/// returns.
pub struct Context {
    params: Params,
    handlers: Arc<[BoxedHandler]>,
    cursor: usize,
    aborted: bool,
    error_handler: ErrorHandler,
    store: Option<Store>,
}

impl Context {
    pub(crate) fn new(handlers: Arc<[BoxedHandler]>, params: Params, error_handler: ErrorHandler) -> Self {
        Self { params, handlers, cursor: 0, aborted: false, error_handler, store: None }
    }

    /// Path parameters captured by the matched route.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// A single path parameter. For `/user/:id` on `/user/42`, `param("id")` is `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Invokes the next handler in the chain.
    ///
    /// Does nothing once [`fail`](Context::fail) has been called, and does
    /// nothing when the chain is exhausted, so a last handler that calls
    /// `next` anyway is harmless. The cursor moves before the handler runs:
    /// a handler calling `next` itself reaches the one after it.
    pub fn next(&mut self, req: &Request, res: &mut Response) {
        if self.aborted {
            return;
        }

        let position = self.cursor;
        self.cursor += 1;

        let handlers = Arc::clone(&self.handlers);
        match handlers.get(position) {
            Some(handler) => {
                trace!(position, len = handlers.len(), "invoking handler");
                handler.call(self, req, res);
            }
            None => trace!(position, "handler chain exhausted"),
        }
    }

    /// Aborts the chain and lets the error responder write the response.
    ///
    /// Every later [`next`](Context::next) call becomes a no-op. This does not
    /// unwind: the calling handler keeps running until it returns, so return
    /// right after calling `fail`. Handlers upstream still run the code that
    /// follows their own `next` call. Each call invokes the responder again.
    pub fn fail(&mut self, req: &Request, res: &mut Response, message: &str, code: u16) {
        self.aborted = true;
        debug!(code, reason = message, path = req.path(), "handler chain aborted");
        (self.error_handler)(req, res, message, code);
    }

    /// Whether [`fail`](Context::fail) has been called for this request.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Stores `value` under `key` unless the key is already taken.
    ///
    /// Returns `false` and keeps the existing value if it is.
    pub fn set<V: Any + Send>(&mut self, key: impl Into<String>, value: V) -> bool {
        self.store_mut().set(key, value)
    }

    /// Stores `value` under `key`, replacing any existing value.
    pub fn force_set<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.store_mut().force_set(key, value);
    }

    /// Fetches the value under `key`, provided it was stored as a `V`.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.store.as_ref()?.get(key)
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.store.as_mut()?.get_mut(key)
    }

    /// Removes `key` from the store. Absent keys are ignored.
    pub fn delete(&mut self, key: &str) {
        self.store_mut().delete(key);
    }

    /// The request's store, created on first use.
    pub fn store_mut(&mut self) -> &mut Store {
        self.store.get_or_insert_with(Store::new)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("params", &self.params)
            .field("cursor", &self.cursor)
            .field("handlers", &self.handlers.len())
            .field("aborted", &self.aborted)
            .field("store", &self.store)
            .finish()
    }
}
