//! The JSON-RPC client itself: per-call validation, hooks, and the HTTP
//! exchange.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::Error;
use crate::protocol::{classify, JsonRpcRequest};

/// Called with `(method, params)` before the request is serialized. An `Err`
/// aborts the call without touching the network.
pub type BeforeRequestHook =
    Box<dyn Fn(&str, Option<&serde_json::Value>) -> Result<(), Error> + Send + Sync>;

/// Called with the decoded response payload; its return value resolves the
/// call. The default hook extracts the `result` field.
pub type AfterRequestHook =
    Box<dyn Fn(serde_json::Value) -> Result<serde_json::Value, Error> + Send + Sync>;

/// Method-agnostic bitcoind JSON-RPC client over HTTP.
///
/// One instance is long-lived and cheap to share; each [`request`] call is an
/// independent asynchronous exchange. The only state shared between
/// concurrent calls is the immutable configuration, the connection-reusing
/// HTTP client, and the request-id counter.
///
/// [`request`]: RpcClient::request
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    user: String,
    password: String,
    next_id: AtomicU64,
    before_request: BeforeRequestHook,
    after_request: AfterRequestHook,
}

impl RpcClient {
    /// Create a client for the endpoint described by `config`.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client builder uses valid static config");

        Self {
            http,
            url: format!("http://{}:{}/", config.host, config.port),
            user: config.user,
            password: config.password,
            next_id: AtomicU64::new(initial_request_id()),
            before_request: Box::new(|_, _| Ok(())),
            after_request: Box::new(default_after_request),
        }
    }

    /// Replace the no-op pre-request hook (validation, logging, mutation
    /// guards). The hook runs before serialization; an `Err` rejects the
    /// call with zero network I/O.
    pub fn with_before_request(mut self, hook: BeforeRequestHook) -> Self {
        self.before_request = hook;
        self
    }

    /// Replace the post-request hook. The default extracts the `result`
    /// field of the decoded payload (`Null` when absent); an override sees
    /// the whole payload and may transform or validate it.
    pub fn with_after_request(mut self, hook: AfterRequestHook) -> Self {
        self.after_request = hook;
        self
    }

    /// Call `method` on the daemon.
    ///
    /// `params` must be a JSON object (named parameters) or array
    /// (positional), or `None` to omit the field entirely. The returned
    /// value is whatever the post-request hook produces from the decoded
    /// payload; by default, the `result` field with oversized integers
    /// preserved digit-for-digit.
    pub async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        if method.is_empty() {
            return Err(Error::InvalidMethod);
        }
        if let Some(ref params) = params {
            if !params.is_object() && !params.is_array() {
                return Err(Error::InvalidParams);
            }
        }

        (self.before_request)(method, params.as_ref())?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        debug!(
            rpc.id = %id,
            rpc.method = method,
            rpc.has_params = params.is_some(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id: id.clone(),
            method,
            params: params.as_ref(),
        };

        let response = self
            .http
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(&self.user, Some(&self.password))
            .json(&req)
            .send()
            .await?;
        let status = response.status();

        // The whole body is collected before classification; partial bodies
        // never reach the classifier.
        let body = response.text().await?;
        debug!(rpc.id = %id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = %id, rpc.method = method, body = %body, "rpc response body");

        let payload = classify(status, body)?;
        (self.after_request)(payload)
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hooks are opaque and the password stays out of logs.
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

fn default_after_request(payload: serde_json::Value) -> Result<serde_json::Value, Error> {
    match payload {
        serde_json::Value::Object(mut map) => {
            Ok(map.remove("result").unwrap_or(serde_json::Value::Null))
        }
        _ => Ok(serde_json::Value::Null),
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RpcClient {
        // Points at a closed port; validation failures must reject before
        // the address is ever used.
        RpcClient::new(Config {
            host: "127.0.0.1".to_owned(),
            port: 1,
            user: "user".to_owned(),
            password: "password".to_owned(),
        })
    }

    #[tokio::test]
    async fn empty_method_rejects_before_io() {
        let err = test_client()
            .request("", None)
            .await
            .expect_err("empty method must reject");
        assert!(matches!(err, Error::InvalidMethod));
    }

    #[tokio::test]
    async fn scalar_params_reject_before_io() {
        for params in [
            serde_json::json!(42),
            serde_json::json!("positional"),
            serde_json::json!(true),
            serde_json::json!(null),
        ] {
            let err = test_client()
                .request("getblockcount", Some(params))
                .await
                .expect_err("scalar params must reject");
            assert!(matches!(err, Error::InvalidParams));
        }
    }

    #[tokio::test]
    async fn before_request_hook_can_abort() {
        let client = test_client().with_before_request(Box::new(|method, _| {
            if method.starts_with("send") {
                Err(Error::Forbidden)
            } else {
                Ok(())
            }
        }));
        let err = client
            .request("sendtoaddress", Some(serde_json::json!(["addr", 1])))
            .await
            .expect_err("hook must abort");
        assert!(matches!(err, Error::Forbidden));
    }

    #[test]
    fn default_after_request_extracts_result() {
        let payload = serde_json::json!({"result": 42, "error": null, "id": "1"});
        let out = default_after_request(payload).expect("default hook is infallible");
        assert_eq!(out, serde_json::json!(42));
    }

    #[test]
    fn default_after_request_yields_null_when_result_is_absent() {
        let payload = serde_json::json!({"error": {"code": -8, "message": "nope"}, "id": "1"});
        let out = default_after_request(payload).expect("default hook is infallible");
        assert!(out.is_null());
    }

    #[test]
    fn debug_output_hides_the_password() {
        let rendered = format!("{:?}", test_client());
        assert!(!rendered.contains("password"));
    }
}
