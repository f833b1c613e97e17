use std::net::SocketAddr;

use anyhow::Context;
use dealflow::{config::Config, create_app, db, seed, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let conn = db::connect(&config.database_url)
        .await
        .context("failed to open database")?;

    let state = AppState::new(conn, config).context("failed to load text embedder")?;

    if state.config.seed_on_start {
        let inserted = seed::ensure_catalog(&state.db, state.embedder.as_ref(), state.config.seed_companies)
            .await
            .context("failed to seed company catalog")?;
        if inserted > 0 {
            tracing::info!(inserted, "seeded empty catalog");
        }
    }

    let addr = state.config.socket_addr();
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    // peer addresses feed the rate limiter's key extractor
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
