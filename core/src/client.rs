//! Client for the Pokemon API.
//!
//! # Design
//! `PokeClient` holds only its base URL and a transport, and never mutates
//! either after construction. Fetching is split into `build_get_pokemon`,
//! which produces an `HttpRequest`, and `parse_get_pokemon`, which consumes
//! an `HttpResponse`; `get_pokemon_by_name` runs the transport between the
//! two. Both halves are pure, so everything except the round trip itself is
//! testable without a server.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::context::Context;
use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{ClientBuilder, ClientOption};
use crate::transport::{HttpTransport, Transport};
use crate::types::Pokemon;

const POKEMON_PATH: &str = "/api/v2/pokemon/";

/// Synchronous client for `GET /api/v2/pokemon/{name}`.
///
/// Cheap to clone and safe to share between threads when the transport is;
/// the default `HttpTransport` is.
#[derive(Debug, Clone)]
pub struct PokeClient<T = HttpTransport> {
    api_url: String,
    transport: T,
}

impl PokeClient {
    /// A client for the public API with an untimed transport.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Defaults, then each option in order.
    pub fn with_options(options: impl IntoIterator<Item = ClientOption>) -> Self {
        ClientBuilder::new().options(options).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl Default for PokeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PokeClient<T> {
    pub(crate) fn from_parts(api_url: String, transport: T) -> Self {
        Self { api_url, transport }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one Pokemon by name with a single round trip.
    ///
    /// The name is not validated. Errors follow the `FetchError` status-code
    /// convention: `-1` when no response arrived, the response status when it
    /// was not 200, and `200` when the body failed to decode.
    pub fn get_pokemon_by_name(&self, ctx: &Context, name: &str) -> Result<Pokemon, FetchError> {
        let request = self.build_get_pokemon(name)?;
        let response = self.transport.execute(&request, ctx)?;
        debug!(
            name,
            status = response.status,
            content_type = response.header("content-type"),
            "pokemon lookup answered"
        );
        self.parse_get_pokemon(response)
    }

    /// Build the request for `name`. Fails only when the base URL is not
    /// absolute. The name lands in the path as given: `/` and dot segments
    /// are kept, anything else outside the unreserved set is percent-encoded.
    pub fn build_get_pokemon(&self, name: &str) -> Result<HttpRequest, FetchError> {
        Url::parse(&self.api_url).map_err(|e| FetchError::transport(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{POKEMON_PATH}{}", self.api_url, encode_path(name)),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
        })
    }

    pub fn parse_get_pokemon(&self, response: HttpResponse) -> Result<Pokemon, FetchError> {
        check_status(&response)?;
        decode_first(&response.body)
    }
}

/// Anything but exactly 200 is a failure; the body is left untouched.
fn encode_path(name: &str) -> String {
    name.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(FetchError::status(response.status))
}

/// Decode the first JSON value in `body`. Data after it is ignored; an empty
/// body reports `EOF`.
fn decode_first<D: DeserializeOwned>(body: &str) -> Result<D, FetchError> {
    let mut values = serde_json::Deserializer::from_str(body).into_iter::<D>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(FetchError::decode(e.to_string())),
        None => Err(FetchError::decode("EOF")),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::{FetchErrorKind, TransportError};

    /// Replays one canned outcome and records what it was asked to send.
    struct CannedTransport {
        outcome: Result<HttpResponse, TransportError>,
        calls: Cell<usize>,
        last: RefCell<Option<HttpRequest>>,
    }

    impl CannedTransport {
        fn respond(status: u16, body: &str) -> Self {
            Self::new(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }))
        }

        fn new(outcome: Result<HttpResponse, TransportError>) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
                last: RefCell::new(None),
            }
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: &HttpRequest, _ctx: &Context) -> Result<HttpResponse, TransportError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(request.clone());
            self.outcome.clone()
        }
    }

    fn client_with(transport: CannedTransport) -> PokeClient<CannedTransport> {
        PokeClient::builder()
            .api_url("http://localhost:3000")
            .transport(transport)
            .build()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_pokemon_produces_correct_request() {
        let req = PokeClient::builder()
            .api_url("http://localhost:3000")
            .build()
            .build_get_pokemon("pikachu")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v2/pokemon/pikachu");
        assert_eq!(
            req.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_with_relative_base_fails_with_sentinel() {
        let err = PokeClient::with_options([crate::options::with_api_url("my-test-url")])
            .build_get_pokemon("pikachu")
            .unwrap_err();
        assert_eq!(err.status_code, -1);
        assert_eq!(err.message, "relative URL without a base");
    }

    #[test]
    fn build_passes_empty_name_through() {
        let req = PokeClient::new().build_get_pokemon("").unwrap();
        assert_eq!(req.url, "https://pokeapi.co/api/v2/pokemon/");
    }

    #[test]
    fn build_keeps_dot_segments() {
        let req = PokeClient::builder()
            .api_url("http://localhost:3000")
            .build()
            .build_get_pokemon("../berry/1")
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v2/pokemon/../berry/1");
    }

    #[test]
    fn build_encodes_characters_invalid_in_a_path() {
        let req = PokeClient::new().build_get_pokemon("mr mime?#").unwrap();
        assert_eq!(req.url, "https://pokeapi.co/api/v2/pokemon/mr%20mime%3F%23");
    }

    #[test]
    fn build_keeps_base_verbatim() {
        let req = PokeClient::with_options([crate::options::with_api_url("http://localhost:3000/")])
            .build_get_pokemon("ditto")
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000//api/v2/pokemon/ditto");
    }

    #[test]
    fn parse_success() {
        let pokemon = PokeClient::new()
            .parse_get_pokemon(response(200, r#"{"name": "pikachu", "height": 10}"#))
            .unwrap();
        assert_eq!(pokemon.name, "pikachu");
        assert_eq!(pokemon.height, 10);
    }

    #[test]
    fn parse_not_found() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(404, "Not Found"))
            .unwrap_err();
        assert_eq!(err, FetchError::status(404));
    }

    #[test]
    fn parse_redirect_is_not_success() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(301, ""))
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Status(301));
    }

    #[test]
    fn parse_other_2xx_is_not_success() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(204, ""))
            .unwrap_err();
        assert_eq!(err.status_code, 204);
        assert_eq!(err.message, "non-200 status code from the API");
    }

    #[test]
    fn parse_bad_json_keeps_200() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(200, "not json"))
            .unwrap_err();
        assert_eq!(err.status_code, 200);
        assert_eq!(err.kind(), FetchErrorKind::Decode);
        assert!(err.message.starts_with("expected ident"), "{}", err.message);
    }

    #[test]
    fn parse_type_mismatch_reports_serde_message() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(200, r#"{"name": "pikachu", "height": "tall"}"#))
            .unwrap_err();
        assert_eq!(err.status_code, 200);
        assert!(err.message.contains("invalid type"), "{}", err.message);
    }

    #[test]
    fn parse_empty_body_is_eof() {
        let err = PokeClient::new()
            .parse_get_pokemon(response(200, "  \n"))
            .unwrap_err();
        assert_eq!(err, FetchError::decode("EOF"));
    }

    #[test]
    fn parse_ignores_trailing_data() {
        let pokemon = PokeClient::new()
            .parse_get_pokemon(response(200, "{\"name\": \"ditto\", \"height\": 3}\ngarbage"))
            .unwrap();
        assert_eq!(pokemon.name, "ditto");
    }

    #[test]
    fn fetch_makes_exactly_one_call() {
        let client = client_with(CannedTransport::respond(200, r#"{"name": "pikachu", "height": 4}"#));
        let pokemon = client
            .get_pokemon_by_name(&Context::background(), "pikachu")
            .unwrap();
        assert_eq!(pokemon.height, 4);
        assert_eq!(client.transport().calls.get(), 1);
        let sent = client.transport().last.borrow().clone().unwrap();
        assert_eq!(sent.url, "http://localhost:3000/api/v2/pokemon/pikachu");
    }

    #[test]
    fn fetch_surfaces_transport_failure() {
        let client = client_with(CannedTransport::new(Err(TransportError::Request(
            "connection refused".to_string(),
        ))));
        let err = client
            .get_pokemon_by_name(&Context::background(), "pikachu")
            .unwrap_err();
        assert_eq!(err, FetchError::transport("connection refused"));
    }

    #[test]
    fn fetch_with_bad_base_never_calls_transport() {
        let client = PokeClient::builder()
            .api_url("::not a url::")
            .transport(CannedTransport::respond(200, "{}"))
            .build();
        let err = client
            .get_pokemon_by_name(&Context::background(), "pikachu")
            .unwrap_err();
        assert_eq!(err.status_code, -1);
        assert_eq!(client.transport().calls.get(), 0);
    }

    #[test]
    fn repeated_fetch_is_stable() {
        let client = client_with(CannedTransport::respond(200, r#"{"name": "bulbasaur", "height": 7}"#));
        let ctx = Context::background();
        let first = client.get_pokemon_by_name(&ctx, "bulbasaur").unwrap();
        let second = client.get_pokemon_by_name(&ctx, "bulbasaur").unwrap();
        assert_eq!(first, second);
        assert_eq!(client.transport().calls.get(), 2);
    }
}
