use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments/:id/window",
            get(handlers::window::appointment_window),
        )
        .route("/api/window/check", post(handlers::window::check_window))
}
