use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;

mod api;
mod error;
mod feed;
mod ingestion;
mod init;
mod items;
mod keywords;
mod output;
mod relevance;
mod store;
mod telemetry;

use store::PgStore;

#[derive(Parser)]
#[command(name = "rfeed", about = "Regional news feed reader with topic/location filtering")]
struct Cli {
    #[arg(global = true, short, long)]
    dsn: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Init(init::InitCmd),
    Feed(feed::FeedCmd),
    Refresh(ingestion::RefreshCmd),
    Items(items::ItemsCmd),
    Serve(api::ServeCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and RFEED_LOG_FORMAT
    telemetry::config::init_tracing();
    if keywords::load_from_env()? {
        tracing::info!("keyword vocabulary loaded from RFEED_KEYWORDS_FILE");
    }

    let dsn = cli
        .dsn
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| anyhow!("Please provide --dsn or set DATABASE_URL in .env"))?;

    let pool = PgPoolOptions::new().max_connections(5).connect(&dsn).await?;
    let store = PgStore::new(pool.clone());

    match cli.command {
        Commands::Init(args) => init::run(&pool, args).await?,
        Commands::Feed(args) => feed::run(&store, args).await?,
        Commands::Refresh(args) => ingestion::run(&store, args).await?,
        Commands::Items(args) => items::run(&store, args).await?,
        Commands::Serve(args) => api::run(Arc::new(store), args).await?,
    }

    Ok(())
}
