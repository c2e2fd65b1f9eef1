use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use contact_api::config::AppConfig;
use contact_api::database::{ContactRepository, ContactStore, DatabaseManager};
use contact_api::{app, logging, AppState};

#[derive(Parser, Debug)]
#[command(name = "contact-api")]
#[command(about = "Contact records HTTP API")]
#[command(version)]
struct Args {
    #[arg(long, help = "Bind address (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "SQLite URL, e.g. sqlite://contacts.db (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so APP_USER, APP_PASSWORD, JWT_SECRET can live there
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    logging::init(&config.logging);
    tracing::info!("Starting contact API in {:?} mode", config.environment);
    tracing::debug!(?config, "Loaded configuration");

    if config.security.signing_secret().is_none() {
        tracing::warn!("JWT_SECRET is not set; every login will be rejected");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    let repository = ContactRepository::new(pool);
    repository
        .create_schema()
        .await
        .context("failed to create contacts table")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, Arc::new(repository));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Contact API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
