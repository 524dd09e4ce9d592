//! Error taxonomy for the client.
//!
//! Validation failures (`InvalidMethod`, `InvalidParams`) are produced before
//! any network I/O; everything else classifies a completed (or failed) HTTP
//! exchange. All failures surface through the one `Result` returned by
//! [`RpcClient::request`](crate::RpcClient::request); nothing panics and
//! nothing is retried internally.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The method name was empty. Raised before any I/O.
    #[error("method should not be empty")]
    InvalidMethod,

    /// The params value was a scalar. JSON-RPC params must be an object
    /// (named) or an array (positional). Raised before any I/O.
    #[error("parameters should be an object or an array")]
    InvalidParams,

    /// HTTP 401 from the daemon. The body is not inspected.
    #[error("401: unauthorized")]
    Unauthorized,

    /// HTTP 403 from the daemon. The body is not inspected.
    #[error("403: forbidden")]
    Forbidden,

    /// Application-level error reported by the daemon on an HTTP 500.
    ///
    /// When the body carries a standard `{"code", "message"}` error object,
    /// `message` is exactly the daemon's message and `code` is its code.
    /// When the body decodes but has no `error.message`, `message` is the
    /// pretty-printed body and `code` is `None`.
    #[error("{message}")]
    Rpc { code: Option<i64>, message: String },

    /// A non-500 response body that did not parse as JSON. Carries the raw
    /// body text.
    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    /// Network-level failure, or a 500 whose body did not parse as JSON.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, reset, or timeout failure from the HTTP stack.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// An HTTP 500 whose body was not JSON. The raw body is kept verbatim,
    /// prefixed by the status code.
    #[error("{status}: {body}")]
    ErrorStatus { status: u16, body: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::Http(err))
    }
}
