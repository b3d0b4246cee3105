//! Tasker HTTP server binary.
//!
//! Serves the JSON API and the browser UI from one listener. Runs against
//! PostgreSQL when a database URL is given, otherwise on an in-memory store.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tasker_api::config::ApiConfig;
use tasker_core::store::{MemoryStore, PgStore, Store};
use tracing::{info, warn};

/// CLI arguments. Flags override the environment read by
/// `ApiConfig::from_env`.
#[derive(Parser, Debug)]
#[command(
    name = "tasker_server",
    about = "Tasker task tracker server",
    after_help = "Environment: BIND_ADDR, DATABASE_URL, JWT_SECRET, AUTH_SECRET, \
                  ACCESS_TOKEN_TTL_SECS, BCRYPT_COST, RUST_LOG"
)]
struct Args {
    /// Address to listen on.
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL. Without one, data lives in memory only.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Access token lifetime in seconds.
    #[arg(long)]
    token_ttl_secs: Option<i64>,

    /// bcrypt cost for new password hashes.
    #[arg(long)]
    bcrypt_cost: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tasker_api=debug,tasker_core=debug")),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(url) = args.database_url.filter(|url| !url.is_empty()) {
        config.database_url = Some(url);
    }
    if let Some(ttl) = args.token_ttl_secs {
        config.token_ttl_secs = ttl;
    }
    if let Some(cost) = args.bcrypt_cost {
        config.bcrypt_cost = cost;
    }
    let config = config.validated();
    info!(version = tasker_core::version(), bind_addr = %config.bind_addr, "starting tasker_server");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            tasker_core::migrate::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let state = tasker_api::AppState::new(store, config.clone());
    let app = tasker_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
