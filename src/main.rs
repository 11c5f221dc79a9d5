//! Market Scan Server
//!
//! REST API server for vehicle attendance tracking.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_scan_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{storage::PUBLIC_PREFIX, Services},
    AppState,
};

/// Upload limit for camera frames
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("market_scan_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Market Scan Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config).context("Failed to create services")?;

    if let Some(scheduler) = services
        .report_scheduler(&config)
        .context("Invalid reports configuration")?
    {
        scheduler.spawn();
    } else {
        tracing::info!("Daily report scheduler disabled");
    }

    let storage_dir = config.storage.dir.clone();

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state, &storage_dir);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().context("Invalid host address")?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState, storage_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Cars
        .route("/cars", post(api::cars::create_scan))
        .route("/cars/day", get(api::cars::day_attendance))
        .route("/cars/week", get(api::cars::week_attendance))
        .route("/cars/month", get(api::cars::month_attendance))
        .route("/cars/snapshot", get(api::cars::snapshot))
        .route("/cars/:car_number", get(api::cars::car_view))
        // Exception numbers
        .route(
            "/exception-numbers",
            get(api::exception_numbers::list_exception_numbers)
                .post(api::exception_numbers::create_exception_number),
        )
        .route(
            "/exception-numbers/:id",
            axum::routing::delete(api::exception_numbers::delete_exception_number),
        )
        // Attendance window
        .route(
            "/attendance-window",
            get(api::attendance_window::get_attendance_window)
                .put(api::attendance_window::update_attendance_window),
        )
        // Daily reports
        .route("/daily-reports", get(api::daily_reports::get_daily_reports))
        .route("/daily-reports/generate", post(api::daily_reports::generate_daily_report))
        .route("/daily-reports/export", get(api::daily_reports::export_daily_reports))
        // Export
        .route("/export", post(api::export::export_rows))
        // Unknown cars
        .route(
            "/unknown-cars",
            get(api::unknown_cars::list_unknown_cars)
                .post(api::unknown_cars::create_unknown_car)
                .delete(api::unknown_cars::purge_unknown_cars),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(storage_dir))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
