//! JSON-RPC 2.0 wire protocol: the request envelope and the response
//! classifier.
//!
//! Classification is a pure function over `(status, body)` so the status
//! table can be tested without a live transport. Body decoding goes through
//! [`decode_lossless`], which relies on `serde_json`'s `arbitrary_precision`
//! feature: integer literals wider than f64 precision keep their exact
//! digits, recursively through nested objects and arrays.

use reqwest::StatusCode;
use tracing::warn;

use crate::error::{Error, TransportError};

#[derive(serde::Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) id: String,
    pub(crate) method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) params: Option<&'a serde_json::Value>,
}

/// Decode a response body without rounding oversized integers.
pub(crate) fn decode_lossless(body: &str) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(body)
}

/// Classify a completed HTTP exchange into the decoded payload or a typed
/// failure.
///
/// | status | outcome |
/// |---|---|
/// | 401 | [`Error::Unauthorized`], body ignored |
/// | 403 | [`Error::Forbidden`], body ignored |
/// | 500 | daemon error from the body ([`Error::Rpc`]), or [`TransportError::ErrorStatus`] if the body is not JSON |
/// | other | decoded payload, or [`Error::MalformedResponse`] if the body is not JSON |
///
/// The `error` field of the body is only inspected on a 500. A non-500 body
/// carrying a populated `error` still classifies as success; the condition
/// is logged because the daemon almost certainly meant it as a failure.
pub(crate) fn classify(status: StatusCode, body: String) -> Result<serde_json::Value, Error> {
    match status {
        StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
        StatusCode::FORBIDDEN => Err(Error::Forbidden),
        StatusCode::INTERNAL_SERVER_ERROR => match decode_lossless(&body) {
            Ok(payload) => Err(parse_daemon_error(payload)),
            Err(_) => Err(Error::Transport(TransportError::ErrorStatus {
                status: status.as_u16(),
                body,
            })),
        },
        _ => match decode_lossless(&body) {
            Ok(payload) => {
                if has_populated_error(&payload) {
                    warn!(
                        %status,
                        "non-500 response carries a populated `error` field; resolving anyway"
                    );
                }
                Ok(payload)
            }
            Err(_) => Err(Error::MalformedResponse(body)),
        },
    }
}

/// Parse a decoded 500 body into a daemon error.
///
/// The JSON-RPC spec shapes errors as `{"code": <int>, "message": <string>}`.
/// If `error` matches that shape the daemon's message is surfaced verbatim;
/// otherwise the whole decoded body is pretty-printed as the message.
fn parse_daemon_error(payload: serde_json::Value) -> Error {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        #[serde(default)]
        code: Option<i64>,
        message: String,
    }

    if let Some(err) = payload.get("error") {
        if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
            return Error::Rpc {
                code: parsed.code,
                message: parsed.message,
            };
        }
    }

    let pretty = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| payload.to_string());
    Error::Rpc {
        code: None,
        message: pretty,
    }
}

fn has_populated_error(payload: &serde_json::Value) -> bool {
    payload.get("error").is_some_and(|err| !err.is_null())
}
