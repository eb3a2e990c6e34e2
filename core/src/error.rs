//! Error types for the Pokemon API client.
//!
//! # Design
//! `FetchError` is a single flat value: a message plus a status code that
//! doubles as the discriminator. `-1` means the request never produced an
//! HTTP response, any other non-200 code is the server's answer, and `200`
//! means the exchange succeeded but the body did not decode. `kind()` gives
//! the tagged view of the same information.
//!
//! `TransportError` is what a `Transport` reports; it always collapses into a
//! `FetchError` with status code `-1`.

use thiserror::Error;

/// Message carried by every `FetchError` produced from a non-200 response.
pub const NON_200_MESSAGE: &str = "non-200 status code from the API";

/// Status code used when no HTTP response was received.
pub const NO_STATUS: i32 = -1;

/// The error returned by `PokeClient::get_pokemon_by_name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status code {status_code})")]
pub struct FetchError {
    pub message: String,
    pub status_code: i32,
}

/// Classification of a `FetchError`, derived from its status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request could not be built or sent, or the context ended.
    Transport,
    /// The server answered with a status other than 200.
    Status(u16),
    /// The server answered 200 but the body was not a valid record.
    Decode,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: NO_STATUS,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            message: NON_200_MESSAGE.to_string(),
            status_code: i32::from(status),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 200,
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self.status_code {
            200 => FetchErrorKind::Decode,
            code => match u16::try_from(code) {
                Ok(status) => FetchErrorKind::Status(status),
                Err(_) => FetchErrorKind::Transport,
            },
        }
    }
}

/// Failures raised by a `Transport` before an HTTP response is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The context was cancelled before or during the request.
    #[error("context canceled")]
    Canceled,

    /// The context deadline passed before or during the request.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Connection, protocol or I/O failure, with the underlying error text.
    #[error("{0}")]
    Request(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::transport(err.to_string())
    }
}
