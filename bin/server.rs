// Pokemon Priority - Instance API Server
// Password-gated REST API over the instance table

use anyhow::{Context, Result};
use clap::Parser;
use pokemon_priority::api::{build_pool, router, AppState};
use pokemon_priority::config::{ServerCommand, ServerConfig};
use pokemon_priority::{insert_instance, setup_database, verify_count};
use rusqlite::Connection;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let config = ServerConfig::parse();

    match &config.command {
        None | Some(ServerCommand::Serve) => serve(&config).await,
        Some(ServerCommand::InitDb) => init_db(&config),
        Some(ServerCommand::AddInstance { name, kind, data }) => {
            add_instance(&config, name, kind, data)
        }
    }
}

fn open_database(config: &ServerConfig) -> Result<Connection> {
    let conn = Connection::open(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn init_db(config: &ServerConfig) -> Result<()> {
    println!("🔧 Setting up database...");
    let conn = open_database(config)?;
    let count = verify_count(&conn)?;
    println!("✓ Database initialized with WAL mode: {}", config.database.display());
    println!("✓ Instances stored: {}", count);
    Ok(())
}

fn add_instance(config: &ServerConfig, name: &str, kind: &str, data: &str) -> Result<()> {
    let data: Value = serde_json::from_str(data).context("Instance data is not valid JSON")?;
    if !data.is_object() {
        anyhow::bail!("Instance data must be a JSON object");
    }

    let conn = open_database(config)?;
    let id = insert_instance(&conn, name, kind, &data)?;
    println!("✅ Created instance {} '{}' ({})", id, name, kind);
    Ok(())
}

async fn serve(config: &ServerConfig) -> Result<()> {
    println!("🌐 Pokemon Priority - Instance API");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let pool = build_pool(&config.database, config.pool_size)
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;
    println!("✓ Database opened: {}", config.database.display());

    let app = router(AppState::new(pool, config.password.as_str()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "instance API listening");
    println!("\n🚀 Server running on http://localhost:{}", config.port);
    println!("   API: http://localhost:{}/api/instances?password=…", config.port);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
