use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/doctors/:id/availability",
        get(handlers::availability::get_availability).put(handlers::availability::update_availability),
    )
}
