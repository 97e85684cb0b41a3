//! # Clinicly API
//!
//! The web server for the Clinicly clinic management service. It exposes
//! clinic onboarding, the doctor and patient registers, appointment booking
//! backed by the availability engine, and the Stripe billing webhook.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Extract requests and shape responses
//! - **Services**: Clinic-scoped workflows over the storage traits
//! - **Middleware**: Session resolution and error mapping
//! - **Config**: Environment driven settings
//!
//! Storage is reached through `clinicly_core::repositories::Store`, so the
//! same router runs over PostgreSQL in production and an in-memory store in
//! tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Booking, directory and billing workflows
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use clinicly_core::repositories::Store;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Clinic, doctor, patient, appointment and user storage
    pub store: Arc<dyn Store>,
    pub config: config::ApiConfig,
}

/// Builds the application router over the given state.
///
/// Cross-origin and timeout layers are added by [`start_server`].
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Session and clinic onboarding endpoints
        .merge(routes::clinic::routes())
        // Directory endpoints
        .merge(routes::doctor::routes())
        .merge(routes::patient::routes())
        // Booking endpoints
        .merge(routes::availability::routes())
        .merge(routes::appointment::routes())
        // Billing endpoints
        .merge(routes::billing::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and store
///
/// Installs the tracing subscriber at the configured level, builds the
/// router, and serves it until the process is stopped.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use clinicly_api::{config::ApiConfig, start_server};
/// use clinicly_db::PgStore;
///
/// let config = ApiConfig::from_env()?;
/// let pool = clinicly_db::create_pool(&config.database_url).await?;
/// start_server(config, Arc::new(PgStore::new(pool))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = config.server_addr();
    let request_timeout = Duration::from_secs(config.request_timeout);
    let cors_origins = config.cors_origins.clone();

    let state = Arc::new(ApiState { store, config });
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match cors_origins {
        Some(origins) => app.layer(cors_layer(&origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(request_timeout),
    );

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
