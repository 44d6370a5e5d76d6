//! Vendor Management Platform - Backend Server
//!
//! Vendor registration, authentication and profile management for a B2B
//! marketplace.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;
mod store;

pub use config::Config;

use services::{LogoStorage, VendorService};
use store::{PgVendorStore, VendorStore};

/// Headroom for non-file form fields on top of the logo limit
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VendorStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn vendors(&self) -> VendorService {
        VendorService::new(self.store.clone(), &self.config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendor_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Vendor Management Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let logos = LogoStorage::new(&config.uploads);
    logos.ensure_dir().await?;
    tracing::info!("Serving logos from {}", logos.dir().display());

    tokio::task::spawn_blocking(services::credentials::prime_decoy_hash).await?;

    // Create application state
    let state = AppState {
        store: Arc::new(PgVendorStore::new(db_pool)),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = &state.config.uploads;
    let body_limit = uploads.max_file_size + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes(state.clone()))
        .nest_service(&uploads.public_path, ServeDir::new(&uploads.dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
impl AppState {
    /// State backed by an in-memory store with logos in a fresh temp dir
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::for_tests(dir.path());
        let state = Self {
            store: Arc::new(store::MemoryVendorStore::new()),
            config: Arc::new(config),
        };
        (state, dir)
    }
}
