//! # switchyard
//!
//! A small HTTP router built around ordered handler chains.
//!
//! ## The model
//!
//! - A route is a method, a path template, and an **ordered chain** of
//!   handlers. `/user/:id` captures `id`; the first registered route that
//!   matches a path wins.
//! - A handler is a plain synchronous function over a [`Context`], the
//!   [`Request`], and a shared [`Response`] buffer. It passes control on with
//!   [`Context::next`], or stops the chain with [`Context::fail`].
//! - [`Router::mount`] puts a handler in front of every route registered
//!   afterwards whose template starts with a prefix. Logging, auth checks,
//!   and request timing live there.
//! - The [`Context`] also carries a request-scoped store, so one handler can
//!   hand a loaded value to the next.
//!
//! What the router does not do: TLS, body limits, streaming bodies, wildcard
//! segments. The [`Server`] is a thin hyper adapter; the core is transport-free
//! and can be driven in-process with [`Router::handle`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use switchyard::{middleware, Context, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .mount("/", middleware::trace)
//!         .get("/user/:userid/hello", (load_user, greet_user));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! fn load_user(ctx: &mut Context, req: &Request, res: &mut Response) {
//!     let Some(id) = ctx.param("userid").map(str::to_owned) else {
//!         ctx.fail(req, res, "missing user id", 400);
//!         return;
//!     };
//!     ctx.set("user", format!("user #{id}"));
//!     ctx.next(req, res);
//! }
//!
//! fn greet_user(ctx: &mut Context, _req: &Request, res: &mut Response) {
//!     match ctx.get::<String>("user") {
//!         Some(user) => res.write_str(&format!("Hello {user}")),
//!         None => res.write_str("Who are you?"),
//!     }
//! }
//! ```

mod context;
mod error;
mod handler;
mod method;
mod pattern;
mod request;
mod response;
mod route;
mod router;
mod server;
mod store;

pub mod middleware;

pub use context::Context;
pub use error::Error;
pub use handler::{
    BoxedHandler, ErrorHandler, Handler, IntoChain, default_error_handler, default_not_found,
};
pub use http::StatusCode;
pub use method::Method;
pub use pattern::{Params, Pattern};
pub use request::Request;
pub use response::{ContentType, Response};
pub use route::{Mount, Route};
pub use router::Router;
pub use server::Server;
pub use store::Store;
