use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use clap::Args;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, Instrument};

use crate::feed;
use crate::ingestion::{fetch, FeedSource, HttpFeedSource};
use crate::keywords::{self, Vocabulary};
use crate::store::FeedStore;
use crate::telemetry::{self};
use crate::telemetry::ops::serve::Phase as ServePhase;

mod error;
mod routes;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedStore>,
    pub source: Arc<dyn FeedSource>,
    pub vocab: &'static Vocabulary,
}

#[derive(Args)]
pub struct ServeCmd {
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
    /// Origin allowed by CORS (the web frontend)
    #[arg(long, default_value = "http://localhost:5173")]
    pub cors_origin: String,
    /// Skip inserting the default feeds on startup
    #[arg(long, default_value_t = false)]
    pub no_seed: bool,
    /// Per-request timeout in seconds (default: RFEED_FETCH_TIMEOUT_SECS or 20)
    #[arg(long)]
    pub fetch_timeout: Option<u64>,
}

pub fn router(state: AppState) -> Router {
    routes::routes().with_state(state)
}

pub async fn run(store: Arc<dyn FeedStore>, args: ServeCmd) -> Result<()> {
    let log = telemetry::serve();
    let timeout_secs = args.fetch_timeout.unwrap_or_else(fetch::timeout_secs_from_env);
    let root = log.root_span_kv([
        ("addr", args.addr.clone()),
        ("cors_origin", args.cors_origin.clone()),
        ("seed", (!args.no_seed).to_string()),
        ("fetch_timeout_secs", timeout_secs.to_string()),
    ]);

    async move {
        if !args.no_seed {
            let inserted = feed::seed_defaults(store.as_ref()).instrument(log.span(&ServePhase::Seed)).await?;
            log.info(format!("🌱 Seeded {} default feeds", inserted.len()));
        }

        let source: Arc<dyn FeedSource> = Arc::new(HttpFeedSource::new(Duration::from_secs(timeout_secs))?);
        let state = AppState { store, source, vocab: keywords::active() };

        let origin: HeaderValue = args.cors_origin.parse().with_context(|| format!("invalid CORS origin {}", args.cors_origin))?;
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true);
        let app = router(state).layer(cors).layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(&args.addr)
            .instrument(log.span(&ServePhase::Bind))
            .await
            .with_context(|| format!("bind {}", args.addr))?;
        log.info(format!("🚀 Listening on http://{}", listener.local_addr()?));

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        log.info("👋 Server stopped");
        Ok::<(), anyhow::Error>(())
    }
    .instrument(root)
    .await
}

/// Resolves on ctrl-c. If the handler cannot be installed the server keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("ctrl-c handler unavailable, graceful shutdown disabled: {}", e);
        std::future::pending::<()>().await;
    }
}
