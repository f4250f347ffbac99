//! # MeetSlot API Server
//!
//! HTTP entry point for the MeetSlot booking service: user records and
//! conflict-checked appointments between two users.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/meetslot cargo run -p meetslot-api
//! ```

use meetslot_api::app::{build_router, AppState};
use meetslot_api::config::Config;
use meetslot_shared::db::migrations::run_migrations;
use meetslot_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meetslot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "MeetSlot API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
