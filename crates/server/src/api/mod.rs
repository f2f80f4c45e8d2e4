//! REST API for the alert backend

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use lifeconnect_dispatch_core::{intake::VOICE_CALLBACK_PATH, AlertIntake};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub intake: Arc<AlertIntake>,
}

impl ApiState {
    pub fn new(intake: AlertIntake) -> Self {
        Self {
            intake: Arc::new(intake),
        }
    }
}

/// Create the REST API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api", get(handlers::greeting))
        .route("/api/send-alert", post(handlers::send_alert))
        .route(
            VOICE_CALLBACK_PATH,
            get(handlers::voice_prompt).post(handlers::voice_prompt),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The browser app is served from a different origin.
        .layer(CorsLayer::permissive())
}
