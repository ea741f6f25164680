//! Route and mount entries held by a [`Router`](crate::Router).

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::pattern::{Params, Pattern};

/// A registered method + template + handler chain.
///
/// The chain already includes the mounted handlers that applied when the
/// route was registered, in front of the route's own handlers.
pub struct Route {
    method: Method,
    pattern: Pattern,
    handlers: Arc<[BoxedHandler]>,
}

impl Route {
    pub(crate) fn new(method: Method, pattern: Pattern, handlers: Vec<BoxedHandler>) -> Self {
        Self { method, pattern, handlers: handlers.into() }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn pattern(&self) -> &Pattern { &self.pattern }
    pub fn template(&self) -> &str { self.pattern.template() }

    /// Number of handlers in the chain, mounted ones included.
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    pub fn matches(&self, path: &str) -> Option<Params> {
        self.pattern.matches(path)
    }

    pub(crate) fn handlers(&self) -> Arc<[BoxedHandler]> {
        Arc::clone(&self.handlers)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A handler mounted on a path prefix.
///
/// The prefix is compared as a raw string: a mount on `/us` applies to
/// `/user/5` as well as `/us/5`.
pub struct Mount {
    prefix: String,
    handler: BoxedHandler,
}

impl Mount {
    pub(crate) fn new(prefix: &str, handler: BoxedHandler) -> Result<Self, Error> {
        if !prefix.starts_with('/') {
            return Err(Error::InvalidMount(prefix.to_owned()));
        }
        Ok(Self { prefix: prefix.to_owned(), handler })
    }

    pub fn prefix(&self) -> &str { &self.prefix }

    pub fn applies_to(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub(crate) fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::handler::Handler;
    use crate::request::Request;
    use crate::response::Response;

    fn noop(_: &mut Context, _: &Request, _: &mut Response) {}

    #[test]
    fn mount_prefix_is_a_raw_string_prefix() {
        let mount = Mount::new("/us", noop.into_boxed_handler()).unwrap();
        assert!(mount.applies_to("/us"));
        assert!(mount.applies_to("/us/5"));
        assert!(mount.applies_to("/user/5"));
        assert!(!mount.applies_to("/u"));
        assert!(!mount.applies_to("/api"));
    }

    #[test]
    fn mount_prefix_must_be_rooted() {
        assert!(matches!(Mount::new("", noop.into_boxed_handler()), Err(Error::InvalidMount(_))));
        assert!(matches!(Mount::new("api", noop.into_boxed_handler()), Err(Error::InvalidMount(_))));
    }

    #[test]
    fn route_delegates_matching_to_its_pattern() {
        let route = Route::new(
            Method::Get,
            Pattern::compile("/user/:id").unwrap(),
            vec![noop.into_boxed_handler(), noop.into_boxed_handler()],
        );
        assert_eq!(route.chain_len(), 2);
        assert_eq!(route.template(), "/user/:id");
        assert_eq!(route.matches("/user/9").unwrap()["id"], "9");
        assert!(route.matches("/user/9/").is_none());
    }
}
