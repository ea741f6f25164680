//! Incoming HTTP request type.

use percent_encoding::percent_decode_str;

use crate::error::Error;
use crate::method::Method;

/// An incoming HTTP request, as seen by every handler in a chain.
///
/// The path is percent-decoded; the query string is kept as sent. Path
/// parameters are not stored here; they belong to the request's
/// [`Context`](crate::Context).
#[derive(Clone, Debug)]
pub struct Request {
    method: http::Method,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    /// Builds a request with no headers, no query, and an empty body.
    ///
    /// The server builds requests from the wire; this constructor is for
    /// driving a [`Router`](crate::Router) in-process:
    ///
    /// ```rust
    /// use switchyard::{Method, Request};
    ///
    /// let req = Request::new(Method::Post, "/users")
    ///     .with_header("content-type", "application/json")
    ///     .with_body(br#"{"name":"alice"}"#.to_vec());
    /// assert_eq!(req.header("Content-Type"), Some("application/json"));
    /// ```
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: None,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds a request from the wire. Fails if the decoded path is not UTF-8.
    pub(crate) fn from_parts(parts: &http::request::Parts, body: Vec<u8>) -> Result<Self, Error> {
        let raw = parts.uri.path();
        let path = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| Error::InvalidPath(raw.to_owned()))?
            .into_owned();

        // Header values that are not visible ASCII are dropped rather than mangled.
        let headers = parts.headers.iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();

        Ok(Self {
            method: parts.method.clone(),
            path,
            query: parts.uri.query().map(str::to_owned),
            headers,
            body,
        })
    }

    /// The request method, or `None` when it is not one a route can be
    /// registered under (e.g. `PURGE`). Such requests match no route.
    pub fn method(&self) -> Option<Method> {
        Method::try_from(&self.method).ok()
    }

    /// The method as sent on the wire, known or not.
    pub fn method_str(&self) -> &str { self.method.as_str() }

    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
