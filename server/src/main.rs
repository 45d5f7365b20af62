//! Seatwise HTTP server binary.

use seatwise_core::{BookingService, SystemClock};
use seatwise_postgres::{migrate, PostgresCatalog, PostgresLedger, PostgresUserStore};
use seatwise_server::{build_router, AppState, Config, StaticTokenDirectory};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatwise=info,seatwise_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Seatwise server");

    let config = Config::from_env();
    info!(
        database_url = %config.database.url,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;
    migrate(&pool).await?;
    info!("Database connected and migrated");

    let clock = Arc::new(SystemClock);
    let catalog = Arc::new(PostgresCatalog::new(pool.clone(), clock.clone()));
    let ledger = Arc::new(PostgresLedger::new(pool.clone(), clock.clone()));
    let users = Arc::new(PostgresUserStore::new(pool));
    let service = BookingService::new(catalog.clone(), ledger);

    let identity = Arc::new(StaticTokenDirectory::new(
        config
            .auth
            .tokens
            .iter()
            .map(|entry| (entry.token.clone(), entry.identity)),
    ));
    if config.auth.tokens.is_empty() {
        tracing::warn!("AUTH_TOKENS is empty; authenticated endpoints will reject every caller");
    }

    let state = AppState::new(service, catalog, users, identity, clock);
    let app = build_router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
