//! Synchronous client for the Pokemon API.
//!
//! # Overview
//! Fetches a single Pokemon by name from `GET {api_url}/api/v2/pokemon/{name}`
//! and decodes it into [`Pokemon`], or reports a [`FetchError`].
//!
//! ```no_run
//! use pokeapi_client::{with_api_url, Context, PokeClient};
//!
//! let client = PokeClient::with_options([with_api_url("https://pokeapi.co")]);
//! let pikachu = client.get_pokemon_by_name(&Context::background(), "pikachu")?;
//! println!("{} is {} decimetres tall", pikachu.name, pikachu.height);
//! # Ok::<(), pokeapi_client::FetchError>(())
//! ```
//!
//! # Design
//! - `PokeClient` is immutable after construction and holds only the base
//!   URL and a [`Transport`].
//! - Fetching is split into `build_get_pokemon` (request as data) and
//!   `parse_get_pokemon` (response as data); only the transport does I/O.
//! - Every call takes a [`Context`] carrying a deadline and a cancel flag.
//! - `FetchError` keeps a flat message + status code; `-1` means no HTTP
//!   response was received.

mod cancel;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;
pub mod types;

pub use client::PokeClient;
pub use context::{CancelHandle, Context};
pub use error::{FetchError, FetchErrorKind, TransportError, NON_200_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{with_api_url, with_http_client, ClientBuilder, ClientOption, DEFAULT_API_URL};
pub use transport::{HttpTransport, Transport};
pub use types::Pokemon;
