//! # LifeConnect Server
//!
//! HTTP front door for emergency alerts.
//!
//! - `GET /api`: liveness greeting
//! - `POST /api/send-alert`: submit an SOS for a patient
//! - `GET|POST /api/voice?patientId=…`: TwiML fetched by the voice provider

pub mod api;
pub mod config;
pub mod error;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

pub use api::{create_router, ApiState};
pub use config::{AppConfig, ServerConfig};
pub use error::{Error, Result};

/// Build the router for `config`. Fails if provider credentials or the
/// responder table are unusable.
pub fn build_router(config: &AppConfig) -> Result<axum::Router> {
    let intake = lifeconnect_dispatch_core::build_intake(&config.dispatch)?;
    Ok(create_router(ApiState::new(intake)))
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(config: AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(&config)?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
