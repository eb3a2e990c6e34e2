use std::{collections::HashMap, io, net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub use axum::http::StatusCode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub base_experience: i64,
    pub is_default: bool,
    pub types: Vec<String>,
}

pub type Pokedex = Arc<HashMap<String, Pokemon>>;

fn entry(id: u32, name: &str, height: i64, weight: i64, base_experience: i64, types: &[&str]) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        height,
        weight,
        base_experience,
        is_default: true,
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

/// Read-only table served by `app()`, keyed by name.
pub fn pokedex() -> Pokedex {
    let entries = [
        entry(1, "bulbasaur", 7, 69, 64, &["grass", "poison"]),
        entry(4, "charmander", 6, 85, 62, &["fire"]),
        entry(7, "squirtle", 5, 90, 63, &["water"]),
        entry(25, "pikachu", 4, 60, 112, &["electric"]),
        entry(132, "ditto", 3, 40, 101, &["normal"]),
    ];
    Arc::new(entries.into_iter().map(|p| (p.name.clone(), p)).collect())
}

pub fn app() -> Router {
    Router::new()
        .route("/api/v2/pokemon/{name}", get(get_pokemon))
        .with_state(pokedex())
}

/// A router that answers every request with `status` and `body`.
pub fn stub(status: StatusCode, body: &'static str) -> Router {
    Router::new().fallback(move || async move { (status, body) })
}

/// A router that accepts every request and never answers it.
pub fn stall() -> Router {
    Router::new().fallback(|| async {
        debug!("holding request open");
        std::future::pending::<StatusCode>().await
    })
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), io::Error> {
    axum::serve(listener, router).await
}

/// Serve `router` on a random local port from a dedicated thread and return
/// the bound address. The server lives until the process exits.
pub fn spawn(router: Router) -> Result<SocketAddr, io::Error> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> Result<(), io::Error> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run(listener, router).await
        })
    });

    Ok(addr)
}

/// Looks up by name, or by numeric id when the segment parses as one.
async fn get_pokemon(
    State(pokedex): State<Pokedex>,
    Path(name): Path<String>,
) -> Result<Json<Pokemon>, StatusCode> {
    let found = match name.parse::<u32>() {
        Ok(id) => pokedex.values().find(|p| p.id == id),
        Err(_) => pokedex.get(&name),
    };
    debug!(%name, found = found.is_some(), "pokemon lookup");
    found.cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}
