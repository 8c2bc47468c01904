//! REST client: base URL, default options, one method per HTTP verb.
//!
//! # Design
//! `RequestClient` holds a `base_url`, a `default_options` bag and a shared
//! `Transport`. Every verb method forwards to `send`, which resolves the URL,
//! merges per-call options over a copy of the defaults, JSON-encodes the
//! body, runs the transport and interprets the response. The defaults change
//! only through `update_options`/`auth`, which take `&mut self`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{Headers, RequestOptions};
use crate::resolve::resolve_url;
use crate::transport::Transport;

/// Query parameters, encoded in the order given.
pub type Params<'a> = &'a [(&'a str, &'a str)];

/// Header the `auth` token is stored under.
pub const AUTH_HEADER: &str = "Authentication";

/// What a successful `send` produced, by method.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Parsed JSON body. An empty body is `Value::Null`.
    Json(Value),
    /// HEAD: the response headers; the body is never read.
    Headers(Headers),
    /// OPTIONS: the methods listed in the `Allow` header.
    Allow(Vec<String>),
    /// CONNECT: nothing.
    Empty,
}

impl Reply {
    /// Decode a `Json` reply into `T`. Other replies decode as `null`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, RequestError> {
        let value = match self {
            Reply::Json(value) => value,
            _ => Value::Null,
        };
        serde_json::from_value(value).map_err(RequestError::Deserialization)
    }
}

/// Client for a JSON REST API rooted at `base_url`.
#[derive(Clone)]
pub struct RequestClient {
    base_url: String,
    default_options: RequestOptions,
    transport: Arc<dyn Transport>,
}

impl RequestClient {
    /// Client with empty default options and the ureq transport.
    #[cfg(feature = "ureq")]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, RequestOptions::default())
    }

    #[cfg(feature = "ureq")]
    pub fn with_options(base_url: impl Into<String>, options: RequestOptions) -> Self {
        Self::with_transport(base_url, options, crate::transport::UreqTransport::new())
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        options: RequestOptions,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            default_options: options,
            transport: Arc::new(transport),
        }
    }

    #[cfg(feature = "ureq")]
    pub fn from_config(config: ClientConfig) -> Self {
        Self::from_config_with_transport(config, crate::transport::UreqTransport::new())
    }

    pub fn from_config_with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        let mut client = Self::with_transport(config.base_url, config.options, transport);
        if let Some(token) = config.token {
            client.auth(token);
        }
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_options(&self) -> &RequestOptions {
        &self.default_options
    }

    /// Deep-merge `options` into the defaults used by every later request.
    pub fn update_options(&mut self, options: &RequestOptions) {
        self.default_options.merge(options);
        trace!(options = ?self.default_options, "default options updated");
    }

    /// Send `token` verbatim in the `Authentication` header from now on.
    pub fn auth(&mut self, token: impl Into<String>) {
        self.update_options(&RequestOptions::new().header(AUTH_HEADER, token));
    }

    /// Perform one request and interpret the response.
    ///
    /// A body is JSON-encoded and sent with `Content-Type: application/json`.
    /// Non-2xx responses become `RequestError::Status`; transport failures
    /// are returned as `RequestError::Transport` without retry.
    pub fn send<B>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<Reply, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, params, body, options)?;
        let url = request.url.clone();

        debug!(%method, %url, has_body = request.body.is_some(), "sending request");
        let response = self
            .transport
            .execute(request)
            .map_err(RequestError::Transport)?;
        debug!(%method, %url, status = response.status, "received response");

        if !response.is_success() {
            return Err(RequestError::status_error(
                method,
                url,
                response.status,
                &response.body,
            ));
        }
        interpret(method, &url, response)
    }

    fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<HttpRequest, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let url = resolve_url(&self.base_url, path, params)?;
        let mut merged = match options {
            Some(options) => self.default_options.merged(options),
            None => self.default_options.clone(),
        };

        let body = body
            .map(|body| {
                merged.headers.insert("Content-Type", "application/json");
                serde_json::to_string(body).map_err(RequestError::Serialization)
            })
            .transpose()?;

        let mut extensions = merged.extensions();
        extensions.remove("method");

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: merged.headers,
            body,
            extensions,
        })
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError> {
        self.send(HttpMethod::Get, path, params, None::<&()>, options)?
            .decode()
    }

    /// HEAD never reads a body; the response headers are returned instead.
    pub fn head(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        options: Option<&RequestOptions>,
    ) -> Result<Headers, RequestError> {
        match self.send(HttpMethod::Head, path, params, None::<&()>, options)? {
            Reply::Headers(headers) => Ok(headers),
            other => unreachable!("HEAD produced {other:?}"),
        }
    }

    pub fn post<T, B>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Post, path, params, body, options)?
            .decode()
    }

    pub fn put<T, B>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Put, path, params, body, options)?
            .decode()
    }

    pub fn delete<T, B>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Delete, path, params, body, options)?
            .decode()
    }

    pub fn patch<T, B>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Patch, path, params, body, options)?
            .decode()
    }

    /// Returns the methods listed in the response's `Allow` header, or an
    /// empty list when the header is missing.
    pub fn options<B>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<String>, RequestError>
    where
        B: Serialize + ?Sized,
    {
        match self.send(HttpMethod::Options, path, params, body, options)? {
            Reply::Allow(methods) => Ok(methods),
            other => unreachable!("OPTIONS produced {other:?}"),
        }
    }

    pub fn connect(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        options: Option<&RequestOptions>,
    ) -> Result<(), RequestError> {
        self.send(HttpMethod::Connect, path, params, None::<&()>, options)?;
        Ok(())
    }

    pub fn trace<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Params<'_>>,
        options: Option<&RequestOptions>,
    ) -> Result<T, RequestError> {
        self.send(HttpMethod::Trace, path, params, None::<&()>, options)?
            .decode()
    }
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.base_url)
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

/// Turn a 2xx response into the reply its method calls for.
fn interpret(method: HttpMethod, url: &str, response: HttpResponse) -> Result<Reply, RequestError> {
    match method {
        HttpMethod::Head => Ok(Reply::Headers(response.headers)),
        HttpMethod::Options => Ok(Reply::Allow(match response.header("Allow") {
            Some(allow) => parse_allow(allow),
            None => {
                warn!(%url, "OPTIONS response has no Allow header");
                Vec::new()
            }
        })),
        HttpMethod::Connect => Ok(Reply::Empty),
        _ => parse_json(&response.body).map(Reply::Json),
    }
}

fn parse_allow(header: &str) -> Vec<String> {
    header
        .split(',')
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_json(body: &str) -> Result<Value, RequestError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(RequestError::Deserialization)
}
