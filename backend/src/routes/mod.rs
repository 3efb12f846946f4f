//! Route definitions for the Macrotrack API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::USER_ID_HEADER;
use crate::state::AppState;
use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod conversion;
mod foods;
mod goals;
mod health;
mod nutrition;


pub use conversion::{convert_routes, serving_routes};
pub use foods::food_routes;
pub use goals::goal_routes;
pub use nutrition::nutrition_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Macrotrack API v1" }))
        .nest("/convert", convert_routes())
        .nest("/servings", serving_routes())
        .nest("/foods", food_routes())
        .nest("/nutrition", nutrition_routes())
        .nest("/goals", goal_routes())
}
