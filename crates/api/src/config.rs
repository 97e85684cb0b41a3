//! # API Configuration Module
//!
//! Loads the Clinicly API server configuration from environment variables,
//! falling back to defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `SLOT_INTERVAL_MINUTES`: Granularity of bookable slots (default: 30)
//! - `REQUIRE_SUBSCRIPTION`: Gate clinic routes behind a paid plan (default: true)
//! - `STRIPE_WEBHOOK_SECRET`: Signing secret for billing webhooks
//! - `STRIPE_WEBHOOK_TOLERANCE_SECONDS`: Accepted webhook clock skew (default: 300)

use clinicly_core::availability::{DEFAULT_SLOT_INTERVAL_MINUTES, SlotInterval};
use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the Clinicly API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use clinicly_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Step between generated appointment slots
    pub slot_interval: SlotInterval,

    /// When set, doctor, patient and appointment routes need an active plan
    pub require_subscription: bool,

    pub stripe_webhook_secret: Option<String>,

    pub stripe_webhook_tolerance: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The SLOT_INTERVAL_MINUTES value is not a number between 5 and 240
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Scheduling settings
        let slot_minutes: u32 = env::var("SLOT_INTERVAL_MINUTES")
            .unwrap_or_else(|_| DEFAULT_SLOT_INTERVAL_MINUTES.to_string())
            .parse()
            .wrap_err("Invalid SLOT_INTERVAL_MINUTES value")?;
        let slot_interval = SlotInterval::new(slot_minutes)
            .map_err(|e| eyre::eyre!("Invalid SLOT_INTERVAL_MINUTES value: {}", e))?;

        // Billing settings
        let require_subscription = env::var("REQUIRE_SUBSCRIPTION")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);
        let stripe_webhook_secret = env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());
        let stripe_webhook_tolerance = env::var("STRIPE_WEBHOOK_TOLERANCE_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            slot_interval,
            require_subscription,
            stripe_webhook_secret,
            stripe_webhook_tolerance,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: String::new(),
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            slot_interval: SlotInterval::default(),
            require_subscription: true,
            stripe_webhook_secret: None,
            stripe_webhook_tolerance: 300,
        }
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
