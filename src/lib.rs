//! Method-agnostic JSON-RPC-over-HTTP client for bitcoind-compatible
//! daemons.
//!
//! [`RpcClient`] takes any method name and parameter value, sends one
//! JSON-RPC 2.0 request over HTTP POST with basic auth, and classifies the
//! response into a decoded result or a typed [`Error`]. Oversized integers
//! in the response keep their exact digits instead of being rounded through
//! f64.
//!
//! ```no_run
//! use bitcoind_rpc::{Config, RpcClient};
//!
//! # async fn run() -> Result<(), bitcoind_rpc::Error> {
//! let client = RpcClient::new(Config::default());
//! let count = client.request("getblockcount", None).await?;
//! let block = client
//!     .request("getblockhash", Some(serde_json::json!([0])))
//!     .await?;
//! # let _ = (count, block);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod protocol;

pub use client::{AfterRequestHook, BeforeRequestHook, RpcClient};
pub use config::Config;
pub use error::{Error, TransportError};
