//! Outgoing HTTP response sink.
//!
//! Handlers do not return responses. Every handler in a chain receives the
//! same `&mut Response` and writes into it: status, headers, body bytes. The
//! server converts the finished buffer into a hyper response once the chain
//! returns.

use std::borrow::Cow;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`Response::set_content_type`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Csv,          // text/csv
    EventStream,  // text/event-stream  (SSE)
    FormData,     // application/x-www-form-urlencoded
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream  (binary / file download)
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::EventStream => "text/event-stream",
            Self::FormData    => "application/x-www-form-urlencoded",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A buffered HTTP response shared by every handler of one request.
///
/// Starts as `200 OK` with no headers and an empty body. Writes append, so
/// handlers that write before and after [`Context::next`] wrap the output of
/// everything downstream:
///
/// ```rust
/// use switchyard::{ContentType, Response, StatusCode};
///
/// let mut res = Response::new();
/// res.set_status(StatusCode::CREATED.as_u16());
/// res.set_content_type(ContentType::Json);
/// res.set_header("location", "/users/42");
/// res.write(br#"{"id":42}"#);
/// assert_eq!(res.status(), 201);
/// ```
///
/// [`Context::next`]: crate::Context::next
#[derive(Clone, Debug)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self { status: StatusCode::OK.as_u16(), headers: Vec::new(), body: Vec::new() }
    }

    /// An empty response carrying `code`.
    pub fn with_status(code: u16) -> Self {
        let mut res = Self::new();
        res.set_status(code);
        res
    }

    pub fn status(&self) -> u16 { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    /// Case-insensitive header lookup. Returns the first value set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every existing value of `name` with `value`.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.add_header(name, value);
    }

    /// Appends a value without touching existing ones (e.g. `set-cookie`).
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.set_header("content-type", content_type.as_str());
    }

    /// Appends raw bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Appends UTF-8 text to the body.
    pub fn write_str(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    /// Converts the buffer into a hyper-ready response.
    ///
    /// A status outside `100..=999` becomes `500`; headers whose name or value
    /// is not valid on the wire are dropped. Both are logged.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let Self { status, headers, body } = self;

        let code = StatusCode::from_u16(status).unwrap_or_else(|_| {
            warn!(status, "invalid status code, responding 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut response = http::Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = code;

        let map = response.headers_mut();
        for (name, value) in headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    map.append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }

        response
    }
}

impl Default for Response {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_append() {
        let mut res = Response::new();
        res.write_str("first");
        res.write(b"second");
        assert_eq!(res.text(), "firstsecond");
        assert_eq!(res.status(), 200);
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut res = Response::new();
        res.add_header("X-Trace", "a");
        res.add_header("x-trace", "b");
        res.set_header("X-TRACE", "c");
        assert_eq!(res.headers(), &[("X-TRACE".to_owned(), "c".to_owned())]);
    }

    #[test]
    fn into_inner_carries_status_and_headers() {
        let mut res = Response::with_status(201);
        res.set_content_type(ContentType::Json);
        res.add_header("set-cookie", "a=1");
        res.add_header("set-cookie", "b=2");
        let inner = res.into_inner();
        assert_eq!(inner.status(), StatusCode::CREATED);
        assert_eq!(inner.headers()["content-type"], "application/json");
        assert_eq!(inner.headers().get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn into_inner_rejects_out_of_range_status() {
        let res = Response::with_status(42);
        assert_eq!(res.into_inner().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_inner_drops_invalid_headers() {
        let mut res = Response::new();
        res.add_header("bad header", "x");
        res.add_header("ok", "y");
        let inner = res.into_inner();
        assert_eq!(inner.headers().len(), 1);
    }
}
