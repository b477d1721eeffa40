//! # CareSlot API
//!
//! The API crate provides the web server for the CareSlot telehealth
//! scheduler: the slot catalog, doctors' weekly availability, patient
//! bookings and the appointment window that gates chat and video.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into calls on the scheduling core and the stores
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! Handlers reach persistence only through the store traits in
//! `careslot-db`, so the router can be driven by mocks in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use careslot_core::policy::SchedulingPolicy;
use careslot_db::{
    DbPool,
    store::{AppointmentStore, AvailabilityStore, PgStore},
};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use eyre::Result;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust,ignore
/// let state = Arc::new(ApiState::from_pool(db_pool, &config));
/// let app = build_router(state);
/// ```
pub struct ApiState {
    /// Doctors' selected slots
    pub availability: Arc<dyn AvailabilityStore>,
    /// Booked appointments
    pub appointments: Arc<dyn AppointmentStore>,
    /// Slot grid, overlap rule and default appointment length
    pub policy: SchedulingPolicy,
    /// Zone the stored wall-clock times are written in
    pub timezone: Tz,
}

impl ApiState {
    pub fn new(
        availability: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
        policy: SchedulingPolicy,
        timezone: Tz,
    ) -> Self {
        Self {
            availability,
            appointments,
            policy,
            timezone,
        }
    }

    /// State backed by Postgres for both stores
    pub fn from_pool(db_pool: DbPool, config: &config::ApiConfig) -> Self {
        let store = Arc::new(PgStore::new(db_pool));
        Self::new(store.clone(), store, config.policy, config.timezone)
    }

    /// Current wall-clock time in the clinic's zone
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Router with every endpoint attached to `state`
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::slots::routes())
        .merge(routes::availability::routes())
        .merge(routes::appointments::routes())
        .merge(routes::window::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, builds the router and serves until the listener fails.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let db_pool = careslot_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_pool(db_pool, &config));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(origin) => Some(origin),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                    None
                }
            })
            .collect::<Vec<_>>();

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        timezone = %config.timezone,
        overlap_rule = %config.policy.overlap_rule,
        "Server listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
