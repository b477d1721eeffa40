//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the CareSlot API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `CLINIC_TIMEZONE`: IANA zone appointment times are written in (default: "UTC")
//! - `SLOT_START_HOUR`, `SLOT_END_HOUR`, `SLOT_INTERVAL_MINUTES`: slot grid (default: 8, 20, 30)
//! - `APPOINTMENT_DEFAULT_MINUTES`: length of appointments without an end time (default: 30)
//! - `SLOT_OVERLAP_RULE`: "half-open" (default) or "legacy"

use std::env;
use std::str::FromStr;

use careslot_core::{
    policy::{DEFAULT_APPOINTMENT_MINUTES, OverlapRule, SchedulingPolicy},
    slots::generator::SlotGrid,
};
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

/// Configuration for the CareSlot API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use careslot_api::config::ApiConfig;
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

    /// Zone the clinic's wall-clock appointment times refer to
    pub timezone: Tz,

    /// Slot grid, overlap rule and default appointment length
    pub policy: SchedulingPolicy,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| eyre!("Invalid {} value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric setting, the timezone or the overlap rule cannot be parsed
    /// - The slot grid settings describe an invalid grid
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 3000u16)?;

        // Database settings
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS")
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(30);

        // Scheduling settings
        let timezone = parse_or(&lookup, "CLINIC_TIMEZONE", Tz::UTC)?;
        let defaults = SlotGrid::default();
        let grid = SlotGrid::new(
            parse_or(&lookup, "SLOT_START_HOUR", defaults.start_hour)?,
            parse_or(&lookup, "SLOT_END_HOUR", defaults.end_hour)?,
            parse_or(&lookup, "SLOT_INTERVAL_MINUTES", defaults.interval_minutes)?,
        );
        grid.validate().wrap_err("Invalid slot grid settings")?;

        let policy = SchedulingPolicy {
            grid,
            overlap_rule: parse_or(&lookup, "SLOT_OVERLAP_RULE", OverlapRule::default())?,
            default_duration_minutes: parse_or(
                &lookup,
                "APPOINTMENT_DEFAULT_MINUTES",
                DEFAULT_APPOINTMENT_MINUTES,
            )?,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            timezone,
            policy,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
