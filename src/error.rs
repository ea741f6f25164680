//! Unified error type.

/// The error type returned by switchyard's fallible operations.
///
/// Application-level errors (404, 500 raised through [`Context::fail`], etc.)
/// are HTTP responses, not `Error`s. This type surfaces configuration
/// mistakes caught at registration time and infrastructure failures such as
/// binding to a port.
///
/// [`Context::fail`]: crate::Context::fail
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern `{template}`: {reason}")]
    InvalidPattern { template: String, reason: &'static str },

    #[error("pattern `{template}` declares parameter `{name}` more than once")]
    DuplicateParam { template: String, name: String },

    #[error("invalid mount prefix `{0}`: must start with `/`")]
    InvalidMount(String),

    #[error("request path `{0}` is not UTF-8 once percent-decoded")]
    InvalidPath(String),
}
