//! Server binary: loads config from env (and `.env`), seeds missing collections, mounts the `/api` routes.
//!
//! Run from repo root: `cargo run -p yara-server`

use tokio::net::TcpListener;
use yara_backend::{app_router, load_from_env, seed_all, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("yara_backend=info,tower_http=info")),
        )
        .init();

    let config = load_from_env()?;
    let state = AppState::from_config(&config).await?;
    let initialized = seed_all(&state.store, &state.model, &state.seeds).await?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        resources = ?state.model.names().collect::<Vec<_>>(),
        initialized = ?initialized,
        "collections ready"
    );

    let app = app_router(state, config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Backend server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
