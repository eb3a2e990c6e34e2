//! The I/O seam of the client.
//!
//! # Design
//! `PokeClient` never talks to the network itself; it hands a finished
//! `HttpRequest` to a `Transport` and gets back either an `HttpResponse` or
//! a `TransportError`. `HttpTransport` is the default implementation, a
//! blocking `ureq` agent. Tests and embedders can swap in their own.
//!
//! Non-2xx responses are data, not errors: the agent is configured with
//! `http_status_as_error(false)` so status interpretation stays in the
//! client's parse step. The agent's connections come from
//! `cancel::connector()`, so cancelling the context interrupts a call that
//! is waiting on the server.

use std::fmt;
use std::time::Duration;

use tracing::debug;
use ureq::unversioned::resolver::DefaultResolver;

use crate::cancel::{self, CancelScope};
use crate::context::Context;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
pub trait Transport {
    /// Executes `request`, honouring the cancellation flag and deadline of
    /// `ctx`. A context that is already done must fail without sending.
    fn execute(&self, request: &HttpRequest, ctx: &Context) -> Result<HttpResponse, TransportError>;
}

/// Blocking HTTP transport backed by a `ureq::Agent`.
///
/// Clones share the agent and its connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// A transport with no timeout of its own; only the context bounds a call.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A transport whose calls never run longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        let agent = ureq::Agent::with_parts(config, cancel::connector(), DefaultResolver::default());
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Map a failed call onto the context first, so a call cut short by the
    /// deadline or a cancel reports that rather than the socket error.
    fn classify(&self, ctx: &Context, err: ureq::Error) -> TransportError {
        match ctx.err() {
            Some(ctx_err) => ctx_err,
            None => TransportError::Request(err.to_string()),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest, ctx: &Context) -> Result<HttpResponse, TransportError> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let _scope = CancelScope::enter(ctx.cancel_flag());
        let timeout = effective_timeout(self.timeout, ctx.remaining());
        debug!(method = request.method.as_str(), url = %request.url, ?timeout, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .config()
            .timeout_global(timeout)
            .build()
            .call()
            .map_err(|err| self.classify(ctx, err))?;

        if ctx.is_cancelled() {
            return Err(TransportError::Canceled);
        }

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|err| self.classify(ctx, err))?;

        debug!(status, bytes = bytes.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// The tighter of the transport timeout and the time left on the context.
fn effective_timeout(transport: Option<Duration>, remaining: Option<Duration>) -> Option<Duration> {
    match (transport, remaining) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
