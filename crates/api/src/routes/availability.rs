use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors/:id/available-times",
            get(handlers::availability::available_times),
        )
        .route(
            "/api/doctors/:id/availability",
            get(handlers::availability::date_availability),
        )
}
