//! HTTP request and response values exchanged with a [`Transport`].
//!
//! # Design
//! Requests and responses are plain data. `PokeClient` builds an
//! `HttpRequest` and parses an `HttpResponse` without touching the network;
//! the transport is the only component that performs I/O. Keeping both ends
//! as owned values lets tests feed canned responses straight into the parser.
//!
//! [`Transport`]: crate::transport::Transport

/// HTTP method for a request. The API surface only ever reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An outbound request described as plain data.
///
/// Built by `PokeClient::build_get_pokemon`. `url` is already absolute and
/// validated; the request never carries a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// A response described as plain data.
///
/// Produced by a transport after the round trip, then consumed by
/// `PokeClient::parse_get_pokemon`. Dropping it releases the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
