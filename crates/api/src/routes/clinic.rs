use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/me", get(handlers::session::me))
        .route("/api/clinics", post(handlers::clinic::create_clinic))
}
