//! Axum router wiring.
//!
//! `/update` routes accept every method so that the endpoint itself answers
//! non-POST requests with 405. The wildcard does not match an empty tail, so
//! `/update/` is registered on its own.

use axum::{
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/update", any(transport::update::update))
        .route("/update/", any(transport::update::update))
        .route("/update/*rest", any(transport::update::update))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
