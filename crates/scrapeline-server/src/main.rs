//! scrapeline server
//!
//! - Config: `scrapeline.yaml` (or the path given as the first argument)
//! - Scrape endpoint: `/metrics` by default
//! - Demo endpoints: `/`, `/health`, `/api/data`, `/api/slow`, `/api/error`

use tracing_subscriber::{fmt, EnvFilter};

use scrapeline_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "scrapeline.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen = cfg
        .server
        .listen_addr()
        .expect("server.listen must be a valid SocketAddr");

    // bad config or registration conflicts: refuse to start
    let state = app_state::AppState::new(cfg).expect("startup failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "scrapeline-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
