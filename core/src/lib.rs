//! Blocking JSON REST client with a pluggable transport.
//!
//! # Overview
//! `RequestClient` holds a base URL and default request options and exposes
//! one method per HTTP verb. Each call resolves a URL, merges options,
//! JSON-encodes the body, runs one round trip through a `Transport`, and
//! returns the parsed JSON body or a `RequestError::Status` for non-2xx
//! responses.
//!
//! # Design
//! - Request building and response parsing are pure; all I/O sits behind the
//!   `Transport` trait, so tests swap in a closure.
//! - `UreqTransport` (feature `ureq`, on by default) is the real network
//!   transport.
//! - Options merge deeply: headers key by key, nested option objects at
//!   every depth. Per-call options never modify the client's defaults.
//! - Types use owned `String` / `Vec` fields so requests move freely into a
//!   transport.
//!
//! ```no_run
//! use request_client::{RequestClient, RequestError};
//! use serde_json::{json, Value};
//!
//! # fn main() -> Result<(), RequestError> {
//! let mut client = RequestClient::new("https://api.example.com/api/");
//! client.auth("Token jwt.token.here");
//!
//! let tags: Value = client.get("./tags", None, None)?;
//! let user: Value = client.post("./users", None, Some(&json!({"user": {}})), None)?;
//! # let _ = (tags, user);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod resolve;
pub mod transport;

pub use client::{Params, Reply, RequestClient, AUTH_HEADER};
pub use config::ClientConfig;
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, UnknownMethod};
pub use options::{merge_json, Credentials, Headers, RequestOptions};
pub use resolve::resolve_url;
pub use transport::{Transport, TransportError};

#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
