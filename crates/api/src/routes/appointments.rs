use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors/:id/appointments",
            post(handlers::appointments::book_appointment),
        )
        .route(
            "/api/doctors/:id/appointments/upcoming",
            get(handlers::appointments::upcoming_appointments),
        )
        .route(
            "/api/appointments/:id/status",
            put(handlers::appointments::update_status),
        )
}
