//! Binary entrypoint for the KiteWind HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`kitewind_server::config`]. Log filtering follows `RUST_LOG` (default
//! `info`).

use tracing_subscriber::EnvFilter;

use kitewind_server::config::ServerConfig;
use kitewind_server::router::build_router;
use kitewind_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config);
    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("kitewind server starting on {}", addr);
    tracing::info!("share links point at {}", config.public_url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
