//! City Data Trust API Server
//!
//! REST surface for the disaster warning dashboard and the
//! policy-gated dataset exchange.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod csv;
mod error;
mod rate_limit;
mod routes;

pub use config::ServerConfig;
pub use error::ApiError;

use alert_engine::{AlertAggregator, Thresholds};
use audit_log::AuditTrail;
use data_vault::VaultKey;
use sensor_data::Validator;
use storage::Repository;

/// How many recent records per sector feed the alert endpoints
pub const RECENT_WINDOW: usize = 10;

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Repository,
    /// Payload encryption key
    pub vault_key: VaultKey,
    /// Audit trail
    pub audit: AuditTrail,
    /// Threshold table, exposed read-only
    pub thresholds: Thresholds,
    /// Batch alert analyzer
    pub aggregator: AlertAggregator,
    /// Boundary validator for uploads and imports
    pub validator: Validator,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state around a vault key
    pub fn new(vault_key: VaultKey) -> Self {
        let thresholds = Thresholds::default();
        Self {
            repository: Repository::new(),
            vault_key,
            audit: AuditTrail::new(),
            thresholds,
            aggregator: AlertAggregator::new(thresholds),
            validator: Validator::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub repository: String,
    pub audit: String,
    pub disaster_monitoring: String,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub record_count: usize,
    pub audit_entries: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let access_governor =
        rate_limit::create_governor_config(&rate_limit::RateLimitConfig::strict());

    let access_routes = Router::new()
        .route("/api/access/request", post(routes::access::request_access))
        .route("/api/access/logs", get(routes::access::get_logs))
        .layer(GovernorLayer {
            config: access_governor,
        });

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/disaster/alerts", get(routes::alerts::get_disaster_alerts))
        .route(
            "/api/disaster/alerts/:sector",
            get(routes::alerts::get_sector_alerts),
        )
        .route(
            "/api/disaster/sectors/stats",
            get(routes::alerts::get_sector_stats),
        )
        .route("/api/disaster/thresholds", get(routes::alerts::get_thresholds))
        .route("/api/dataset/upload", post(routes::datasets::upload))
        .route("/api/dataset/import", post(routes::datasets::import_csv))
        .route("/api/dataset/export", get(routes::datasets::export_csv))
        .route("/api/dataset", get(routes::datasets::get_all))
        .route("/api/system/reset", post(routes::system::reset_system))
        .merge(access_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let response = HealthResponse {
        status: "OK".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            repository: "ok".to_string(),
            audit: "ok".to_string(),
            disaster_monitoring: "active".to_string(),
        },
        metrics: SystemMetrics {
            record_count: state.repository.record_count(),
            audit_entries: state.audit.len(),
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(config.vault_key()?));
    let app = create_router(state);

    info!("Starting API server on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    // Peer addresses are needed by the rate limiter's IP key extractor
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
