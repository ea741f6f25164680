//! Handler trait, type erasure, and handler chains.
//!
//! # How handlers are stored
//!
//! A route owns an ordered list of handlers of *different* concrete types, and
//! a router owns many routes. Rust collections hold one concrete type, so each
//! handler is erased once, at registration, behind `dyn ErasedHandler`:
//!
//! ```text
//! fn hello(ctx: &mut Context, req: &Request, res: &mut Response) { … }   ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                                             ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                                             ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(ctx, req, res)  when the context reaches it               ← one vtable dispatch
//! ```
//!
//! Handlers are synchronous. Control passes down the chain only when a
//! handler calls [`Context::next`]; code after that call runs once everything
//! downstream has returned.

use std::sync::Arc;

use crate::context::Context;
use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, ctx: &mut Context, req: &Request, res: &mut Response);
}

/// A type-erased handler shared by every request that reaches its route.
///
/// Cloning is one atomic increment. A mounted handler is the same
/// `BoxedHandler` in every route it was resolved into.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// function or closure with the signature:
///
/// ```text
/// fn name(ctx: &mut Context, req: &Request, res: &mut Response)
/// ```
///
/// Closures need their parameter types spelled out, since the router accepts
/// handlers generically:
///
/// ```rust
/// use switchyard::{Context, Request, Response, Router};
///
/// let greeting = String::from("hello");
/// let app = Router::new().get("/", move |_: &mut Context, _: &Request, res: &mut Response| {
///     res.write_str(&greeting);
/// });
/// # let _ = app;
/// ```
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F> private::Sealed for F
where
    F: Fn(&mut Context, &Request, &mut Response) + Send + Sync + 'static,
{
}

impl<F> Handler for F
where
    F: Fn(&mut Context, &Request, &mut Response) + Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype bridging a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F> ErasedHandler for FnHandler<F>
where
    F: Fn(&mut Context, &Request, &mut Response),
{
    fn call(&self, ctx: &mut Context, req: &Request, res: &mut Response) {
        (self.0)(ctx, req, res)
    }
}

// ── Handler chains ────────────────────────────────────────────────────────────

/// Anything that can be registered as a route's handler chain.
///
/// Implemented for a single [`Handler`], for tuples of up to eight handlers
/// (run left to right), and for an already-erased `Vec<BoxedHandler>`:
///
/// ```rust,no_run
/// # use switchyard::{Context, Request, Response, Router};
/// # fn load_user(_: &mut Context, _: &Request, _: &mut Response) {}
/// # fn show_user(_: &mut Context, _: &Request, _: &mut Response) {}
/// Router::new()
///     .get("/user/:id", show_user)
///     .get("/user/:id/hello", (load_user, show_user));
/// ```
///
/// The marker parameter `M` only keeps the impls apart; callers never name it.
pub trait IntoChain<M> {
    fn into_chain(self) -> Vec<BoxedHandler>;
}

#[doc(hidden)]
pub enum Single {}

impl<H: Handler> IntoChain<Single> for H {
    fn into_chain(self) -> Vec<BoxedHandler> {
        vec![self.into_boxed_handler()]
    }
}

impl IntoChain<Vec<BoxedHandler>> for Vec<BoxedHandler> {
    fn into_chain(self) -> Vec<BoxedHandler> {
        self
    }
}

macro_rules! impl_into_chain_for_tuple {
    ($($h:ident),+) => {
        impl<$($h: Handler),+> IntoChain<($($h,)+)> for ($($h,)+) {
            #[allow(non_snake_case)]
            fn into_chain(self) -> Vec<BoxedHandler> {
                let ($($h,)+) = self;
                vec![$($h.into_boxed_handler()),+]
            }
        }
    };
}

impl_into_chain_for_tuple!(H1, H2);
impl_into_chain_for_tuple!(H1, H2, H3);
impl_into_chain_for_tuple!(H1, H2, H3, H4);
impl_into_chain_for_tuple!(H1, H2, H3, H4, H5);
impl_into_chain_for_tuple!(H1, H2, H3, H4, H5, H6);
impl_into_chain_for_tuple!(H1, H2, H3, H4, H5, H6, H7);
impl_into_chain_for_tuple!(H1, H2, H3, H4, H5, H6, H7, H8);

// ── Responders ────────────────────────────────────────────────────────────────

/// Error responder invoked by [`Context::fail`] with the failure message and
/// status code.
pub type ErrorHandler = Arc<dyn Fn(&Request, &mut Response, &str, u16) + Send + Sync + 'static>;

/// Writes `message` as a plain-text body with status `code`.
///
/// The body is the message followed by a newline. This is the responder a
/// router uses until [`Router::error_handler`](crate::Router::error_handler)
/// replaces it.
pub fn default_error_handler(_req: &Request, res: &mut Response, message: &str, code: u16) {
    plain_text(res, message, code);
}

/// Responds `404` with `404 page not found`.
///
/// Used by a router until [`Router::not_found`](crate::Router::not_found)
/// replaces it.
pub fn default_not_found(_ctx: &mut Context, _req: &Request, res: &mut Response) {
    plain_text(res, "404 page not found", 404);
}

fn plain_text(res: &mut Response, message: &str, code: u16) {
    res.set_status(code);
    res.set_header("content-type", "text/plain; charset=utf-8");
    res.set_header("x-content-type-options", "nosniff");
    res.write_str(message);
    res.write(b"\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::pattern::Params;

    fn a(_: &mut Context, _: &Request, res: &mut Response) { res.write_str("a") }
    fn b(_: &mut Context, _: &Request, res: &mut Response) { res.write_str("b") }

    fn run(chain: Vec<BoxedHandler>) -> Response {
        let req = Request::new(Method::Get, "/");
        let mut res = Response::new();
        let mut ctx = Context::new(Vec::new().into(), Params::new(), Arc::new(default_error_handler));
        for handler in &chain {
            handler.call(&mut ctx, &req, &mut res);
        }
        res
    }

    #[test]
    fn single_handler_is_a_chain_of_one() {
        assert_eq!(a.into_chain().len(), 1);
    }

    #[test]
    fn tuples_keep_their_order() {
        let chain = (a, b, a).into_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(run(chain).text(), "aba");
    }

    #[test]
    fn erased_vec_passes_through() {
        let chain = vec![b.into_boxed_handler(), a.into_boxed_handler()].into_chain();
        assert_eq!(run(chain).text(), "ba");
    }

    #[test]
    fn default_error_handler_writes_plain_text() {
        let req = Request::new(Method::Get, "/");
        let mut res = Response::new();
        default_error_handler(&req, &mut res, "boom", 500);
        assert_eq!(res.status(), 500);
        assert_eq!(res.text(), "boom\n");
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
    }
}
