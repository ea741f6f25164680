//! Request router.
//!
//! One ordered route list per HTTP method. A request is matched against its
//! method's routes in registration order and the first match wins, so when
//! two templates both fit a path (`/user/new` and `/user/:id`), register the
//! one that should take precedence first.
//!
//! # Mounted handlers
//!
//! [`Router::mount`] attaches a handler to every route whose *template* starts
//! with the mount prefix. Mounts are resolved once, when a route is
//! registered, so mount first and register routes after:
//!
//! ```rust
//! use switchyard::{middleware, Context, Request, Response, Router};
//!
//! fn index(_: &mut Context, _: &Request, res: &mut Response) {
//!     res.write_str("index");
//! }
//!
//! let app = Router::new()
//!     .mount("/", middleware::trace)   // applies to `/` below
//!     .get("/", index)
//!     .mount("/api", middleware::trace); // does not apply to `/`
//! # let _ = app;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{
    BoxedHandler, ErrorHandler, Handler, IntoChain, default_error_handler, default_not_found,
};
use crate::method::Method;
use crate::pattern::{Params, Pattern};
use crate::request::Request;
use crate::response::Response;
use crate::route::{Mount, Route};

/// The application router.
///
/// Build it once at startup, then share it (the server wraps it in an `Arc`).
/// Each builder call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
    mounts: Vec<Mount>,
    not_found: Arc<[BoxedHandler]>,
    error_handler: ErrorHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            mounts: Vec::new(),
            not_found: Arc::new([default_not_found.into_boxed_handler()]),
            error_handler: Arc::new(default_error_handler),
        }
    }

    /// Registers a handler chain for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `:name` segments; handlers read them with
    /// [`Context::param`]:
    ///
    /// ```rust,no_run
    /// # use switchyard::{Context, Method, Request, Response, Router};
    /// # fn get_user(_: &mut Context, _: &Request, _: &mut Response) {}
    /// # fn load_user(_: &mut Context, _: &Request, _: &mut Response) {}
    /// # fn delete_user(_: &mut Context, _: &Request, _: &mut Response) {}
    /// Router::new()
    ///     .on(Method::Get,    "/users/:id", get_user)
    ///     .on(Method::Delete, "/users/:id", (load_user, delete_user));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid template. Use [`Router::try_on`] to
    /// handle the error instead.
    pub fn on<M>(mut self, method: Method, path: &str, chain: impl IntoChain<M>) -> Self {
        if let Err(e) = self.try_on(method, path, chain) {
            panic!("invalid route `{path}`: {e}");
        }
        self
    }

    /// Fallible form of [`Router::on`].
    pub fn try_on<M>(&mut self, method: Method, path: &str, chain: impl IntoChain<M>) -> Result<(), Error> {
        let pattern = Pattern::compile(path)?;

        // Mounts are matched against the template, not against request paths.
        let mut handlers: Vec<BoxedHandler> = self.mounts.iter()
            .filter(|mount| mount.applies_to(path))
            .map(|mount| Arc::clone(mount.handler()))
            .collect();
        let mounted = handlers.len();
        handlers.extend(chain.into_chain());

        debug!(%method, path, mounted, handlers = handlers.len(), "route registered");

        self.routes
            .entry(method)
            .or_default()
            .push(Route::new(method, pattern, handlers));
        Ok(())
    }

    pub fn get<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Get, path, chain)
    }

    pub fn post<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Post, path, chain)
    }

    pub fn put<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Put, path, chain)
    }

    pub fn delete<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Delete, path, chain)
    }

    pub fn patch<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Patch, path, chain)
    }

    pub fn head<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Head, path, chain)
    }

    pub fn options<M>(self, path: &str, chain: impl IntoChain<M>) -> Self {
        self.on(Method::Options, path, chain)
    }

    /// Mounts `handler` in front of every route registered *after* this call
    /// whose template starts with `prefix`.
    ///
    /// Mounted handlers run in mount order, before the route's own handlers.
    /// The prefix is a raw string prefix, not a segment boundary.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` does not start with `/`.
    pub fn mount(mut self, prefix: &str, handler: impl Handler) -> Self {
        if let Err(e) = self.try_mount(prefix, handler) {
            panic!("invalid mount `{prefix}`: {e}");
        }
        self
    }

    /// Fallible form of [`Router::mount`].
    pub fn try_mount(&mut self, prefix: &str, handler: impl Handler) -> Result<(), Error> {
        self.mounts.push(Mount::new(prefix, handler.into_boxed_handler())?);
        debug!(prefix, position = self.mounts.len() - 1, "handler mounted");
        Ok(())
    }

    /// Replaces the handler run when no route matches.
    ///
    /// It gets a context of its own, with no parameters and no further
    /// handlers.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        let chain: Arc<[BoxedHandler]> = Arc::new([handler.into_boxed_handler()]);
        self.not_found = chain;
        self
    }

    /// Replaces the responder invoked by [`Context::fail`].
    ///
    /// ```rust
    /// use switchyard::{Request, Response, Router};
    ///
    /// let app = Router::new().error_handler(|_: &Request, res: &mut Response, msg: &str, code: u16| {
    ///     res.set_status(code);
    ///     res.write_str(&msg.to_uppercase());
    /// });
    /// # let _ = app;
    /// ```
    pub fn error_handler<F>(mut self, responder: F) -> Self
    where
        F: Fn(&Request, &mut Response, &str, u16) + Send + Sync + 'static,
    {
        let responder: ErrorHandler = Arc::new(responder);
        self.error_handler = responder;
        self
    }

    /// Routes registered under `method`, in match order.
    pub fn routes(&self, method: Method) -> &[Route] {
        self.routes.get(&method).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mounted handlers, in mount order.
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Finds the first route registered under `method` whose template matches
    /// `path`, along with the captured parameters.
    pub fn lookup(&self, method: Method, path: &str) -> Option<(&Route, Params)> {
        self.routes.get(&method)?
            .iter()
            .find_map(|route| route.matches(path).map(|params| (route, params)))
    }

    /// Runs the request through the matched route's chain (or the not-found
    /// handler), writing into `res`.
    ///
    /// `res` is used as given: status, headers, and body already set by the
    /// caller are kept, and handlers write on top of them. A request whose
    /// method is not a [`Method`] gets the not-found handler.
    pub fn dispatch(&self, req: &Request, res: &mut Response) {
        let matched = req.method().and_then(|method| self.lookup(method, req.path()));
        let (handlers, params) = match matched {
            Some((route, params)) => (route.handlers(), params),
            None => {
                debug!(method = req.method_str(), path = req.path(), "no route matched");
                (Arc::clone(&self.not_found), Params::new())
            }
        };

        let mut ctx = Context::new(handlers, params, Arc::clone(&self.error_handler));
        ctx.next(req, res);
    }

    /// Dispatches `req` into a fresh [`Response`] and returns it.
    pub fn handle(&self, req: &Request) -> Response {
        let mut res = Response::new();
        self.dispatch(req, &mut res);
        res
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
