//! Client configuration: defaults, ordered options and the builder.
//!
//! # Design
//! Construction starts from the defaults (`DEFAULT_API_URL`, an
//! `HttpTransport` without timeout) and applies overrides in the order
//! given. A later override of the same field replaces an earlier one.
//! Nothing is validated here; a bad base URL surfaces on the first request.

use crate::client::PokeClient;
use crate::transport::{HttpTransport, Transport};

/// Root of the public Pokemon API.
pub const DEFAULT_API_URL: &str = "https://pokeapi.co";

/// A single configuration override for `PokeClient::with_options`.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Replace the base API URL.
    ApiUrl(String),
    /// Replace the HTTP transport, including its timeout.
    HttpClient(HttpTransport),
}

pub fn with_api_url(api_url: impl Into<String>) -> ClientOption {
    ClientOption::ApiUrl(api_url.into())
}

pub fn with_http_client(transport: HttpTransport) -> ClientOption {
    ClientOption::HttpClient(transport)
}

/// Builder for `PokeClient`, generic over the transport so callers can plug
/// in any `Transport` implementation.
#[derive(Debug, Clone)]
pub struct ClientBuilder<T = HttpTransport> {
    api_url: String,
    transport: T,
}

impl ClientBuilder<HttpTransport> {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            transport: HttpTransport::new(),
        }
    }

    pub fn option(self, option: ClientOption) -> Self {
        match option {
            ClientOption::ApiUrl(api_url) => self.api_url(api_url),
            ClientOption::HttpClient(transport) => self.transport(transport),
        }
    }

    pub fn options(self, options: impl IntoIterator<Item = ClientOption>) -> Self {
        options.into_iter().fold(self, Self::option)
    }
}

impl Default for ClientBuilder<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ClientBuilder<T> {
    /// Stored verbatim; request URLs are `{api_url}/api/v2/pokemon/{name}`.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn transport<U: Transport>(self, transport: U) -> ClientBuilder<U> {
        ClientBuilder {
            api_url: self.api_url,
            transport,
        }
    }

    pub fn build(self) -> PokeClient<T> {
        PokeClient::from_parts(self.api_url, self.transport)
    }
}
