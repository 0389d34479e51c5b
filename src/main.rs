//! CFS tracker server
//!
//! REST API for donation intake, refurbishment inventory and school deliveries.

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cfs_tracker::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting CFS tracker v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    if !config.email.enabled {
        tracing::warn!("Email delivery disabled, notifications will only be logged");
    }

    let addr = SocketAddr::new(
        config.server.host.parse().expect("Invalid host address"),
        config.server.port,
    );

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), config.email.clone());

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        repository,
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Stdout logging in `pretty` or `json` format, plus a daily file when a directory is set
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cfs_tracker={},tower_http=debug", config.level).into());

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "cfs-tracker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    guard
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Identity
        .route("/auth/me", get(api::auth::me))
        // Donations
        .route(
            "/donations",
            post(api::donations::create_donation).get(api::donations::list_donations),
        )
        .route("/donations/mine", get(api::donations::my_donations))
        .route("/donations/stats", get(api::donations::donation_stats))
        .route("/donations/user/:user_id", get(api::donations::user_donations))
        .route("/donations/:id", get(api::donations::get_donation))
        .route("/donations/:id/status", patch(api::donations::update_donation_status))
        // School requests
        .route(
            "/schools/requests",
            post(api::school_requests::create_request).get(api::school_requests::list_requests),
        )
        .route("/schools/requests/mine", get(api::school_requests::my_requests))
        .route("/schools/requests/stats", get(api::school_requests::request_stats))
        .route("/schools/requests/user/:user_id", get(api::school_requests::user_requests))
        .route("/schools/requests/:id", get(api::school_requests::get_request))
        .route(
            "/schools/requests/:id/status",
            patch(api::school_requests::update_request_status),
        )
        // School directory
        .route("/schools", get(api::schools::list_schools))
        .route("/schools/:id", get(api::schools::get_school))
        // Inventory
        .route("/inventory", get(api::inventory::list_inventory))
        .route("/inventory/fulfill", post(api::inventory::fulfill_request))
        .route(
            "/inventory/:id",
            get(api::inventory::get_inventory_item).patch(api::inventory::update_inventory_item),
        )
        // Contact
        .route(
            "/contact",
            post(api::contact::submit_message).get(api::contact::list_messages),
        )
        .route("/contact/:id/status", patch(api::contact::update_message_status))
        // Statistics
        .route("/stats/dashboard", get(api::stats::dashboard))
        .route("/stats/impact-report", get(api::stats::impact_report))
        .route("/stats/beneficiaries", get(api::stats::beneficiaries))
        .route("/stats/reports", get(api::stats::reports))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
}
