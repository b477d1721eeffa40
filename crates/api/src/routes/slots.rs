use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::slots::list_week))
        .route("/api/slots/toggle", post(handlers::slots::toggle_slot))
        .route("/api/slots/:day", get(handlers::slots::list_day))
}
