use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use spice_heritage::auth::{password, session};
use spice_heritage::config::{Cli, Config};
use spice_heritage::db;
use spice_heritage::routes;
use spice_heritage::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Ensure uploads directory exists
    std::fs::create_dir_all(config.uploads_path())?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    let purged = session::purge_expired(&pool)?;
    if purged > 0 {
        tracing::info!("Removed {} expired sessions", purged);
    }
    if password::admin_count(&pool)? == 0 {
        tracing::warn!("No admin account yet; create one at /admin/setup");
    }

    let state = AppState::new(pool, config.clone());
    let app = routes::build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("{} listening on http://{}", config.restaurant.name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
