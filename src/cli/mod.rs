use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, Gateway, MemoryGateway, PgGateway};
use crate::server;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "contact-api")]
#[command(about = "Contact and address management API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(ServeArgs),

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

#[derive(clap::Args, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind address, overrides HOST")]
    pub host: Option<String>,

    #[arg(long, help = "Bind port, overrides PORT")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep data in memory instead of PostgreSQL")]
    pub memory: bool,

    #[arg(long, default_value = "test", help = "Username seeded in memory mode")]
    pub seed_user: String,

    #[arg(long, default_value = "test", help = "Token of the seeded user in memory mode")]
    pub seed_token: String,

    #[arg(long, help = "Skip migrations on startup")]
    pub skip_migrations: bool,
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => serve(args, config).await,
        Some(Commands::Migrate) => migrate(config).await,
        None => {
            serve(
                ServeArgs {
                    seed_user: "test".to_string(),
                    seed_token: "test".to_string(),
                    ..ServeArgs::default()
                },
                config,
            )
            .await
        }
    }
}

/// Gateway the server runs on, plus the pool to close once it stops
struct Store {
    gateway: Arc<dyn Gateway>,
    pool: Option<PgPool>,
}

impl Store {
    async fn open(args: &ServeArgs, config: &AppConfig) -> anyhow::Result<Self> {
        if args.memory {
            let memory = MemoryGateway::new();
            memory.insert_user(&args.seed_user, &args.seed_user, &args.seed_token).await;
            tracing::warn!(
                "Using in-memory store; data is lost on exit (seeded user '{}')",
                args.seed_user
            );
            return Ok(Self {
                gateway: Arc::new(memory),
                pool: None,
            });
        }

        let pool = DatabaseManager::connect(&config.database).await?;
        if !args.skip_migrations {
            DatabaseManager::migrate(&pool).await?;
        }
        Ok(Self {
            gateway: Arc::new(PgGateway::new(pool.clone())),
            pool: Some(pool),
        })
    }

    async fn close(self) {
        if let Some(pool) = self.pool {
            DatabaseManager::close(pool).await;
        }
    }
}

async fn serve(args: ServeArgs, config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Contact API in {:?} mode", config.environment);

    let store = Store::open(&args, config).await?;

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            store.close().await;
            return Err(e).with_context(|| format!("failed to bind {}", bind_addr));
        }
    };

    let result = server::serve(listener, AppState::new(store.gateway.clone()), config).await;
    store.close().await;
    result?;
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    DatabaseManager::close(pool).await;
    Ok(())
}
