//! # IncomeTrack API Server
//!
//! Serves the IncomeTrack REST API: registration and login, income entries,
//! the monthly target, and monthly / year-to-date / yearly summaries.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (`.env` honored)
//! 2. Create the database if missing, connect the pool, run migrations
//! 3. Build the router and serve until Ctrl-C
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/incometrack \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p incometrack-api
//! ```

use incometrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use incometrack_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, PoolConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incometrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "IncomeTrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(
        PoolConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await?;
    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
