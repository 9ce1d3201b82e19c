mod analytics;
mod auth;
mod candidate;
mod config;
mod data;
mod db;
mod employer;
mod errors;
mod models;
mod pagination;
mod routes;
mod state;
mod storage;
mod store;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::credentials::Credentials;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::storage::S3FileStorage;
use crate::store::postgres::PgStore;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruitment API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let files = Arc::new(S3FileStorage::new(
        s3,
        config.s3_bucket.clone(),
        config.files_base_url.clone(),
    ));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let credentials = Credentials::new(
        &config.jwt_secret,
        config.access_token_expire_minutes,
        config.bcrypt_cost,
    );

    let state = AppState {
        store: store.clone(),
        files,
        credentials,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Received shutdown signal");
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = aws_sdk_s3::config::Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "recruitment-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
