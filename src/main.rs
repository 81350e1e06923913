use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::signal;

use company_directory_api::{config, handlers, middleware, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first
    let config = config::Settings::new()?;

    // Initialize structured logging with configuration
    middleware::init_logging(&config.log_level, &config.log_format)?;

    tracing::info!("Starting company directory API v{}", env!("CARGO_PKG_VERSION"));

    // Application state: ensures the database exists and migrations ran
    let app_state = AppState::new(config.clone()).await?;

    let cors_layer = middleware::create_cors_layer(config.cors_allow_origins.clone());

    let app = Router::new()
        // Health check endpoints
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/simple", get(handlers::health_check_simple))
        // Company endpoints
        .route(
            "/api/companies",
            get(handlers::company_handlers::list_companies)
                .post(handlers::company_handlers::create_company),
        )
        .route(
            "/api/companies/batch",
            post(handlers::company_handlers::create_companies),
        )
        .route(
            "/api/companies/full",
            get(handlers::company_handlers::list_companies_with_employees),
        )
        .route(
            "/api/companies/by-employee/:employee_id",
            get(handlers::company_handlers::get_company_by_employee_id),
        )
        .route(
            "/api/companies/:id",
            get(handlers::company_handlers::get_company)
                .put(handlers::company_handlers::update_company)
                .delete(handlers::company_handlers::delete_company),
        )
        .route(
            "/api/companies/:id/full",
            get(handlers::company_handlers::get_company_with_employees),
        )
        .with_state(app_state)
        // Apply middleware layers (global)
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(middleware::create_logging_layer())
        .layer(cors_layer);

    // Run the server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
