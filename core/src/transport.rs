//! The network primitive the client delegates to.
//!
//! # Design
//! `Transport` is the single seam between request building and I/O. The
//! client never inspects a transport failure; it is returned to the caller
//! as the source of `RequestError::Transport`. Closures implement the trait
//! so tests can substitute a double without defining a type.

use crate::http::{HttpRequest, HttpResponse};

/// Failure reported by a transport. Boxed so any error type fits.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// to obtain a response at all (DNS, refused connection, abort) are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use super::{Transport, TransportError};
    use crate::http::{HttpRequest, HttpResponse};
    use crate::options::Headers;

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as data and the client decides what they mean.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Use a caller-configured agent. It must have
        /// `http_status_as_error(false)` or error statuses surface as
        /// transport failures.
        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = ureq::http::Request::builder()
                .method(request.method.as_str())
                .uri(request.url.as_str());
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }

            let mut response = match request.body {
                Some(body) => self.agent.run(builder.body(body)?)?,
                None => self.agent.run(builder.body(())?)?,
            };

            let status = response.status().as_u16();
            let mut headers = Headers::new();
            for (name, value) in response.headers() {
                if let Ok(value) = value.to_str() {
                    headers.append(name.as_str(), value);
                }
            }
            let body = response.body_mut().read_to_string()?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
