//! Mapping of alert failures onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifeconnect_dispatch_core::{DispatchResult, Error};
use serde_json::json;
use tracing::{error, warn};

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid alert request.";
pub const NOT_FOUND_MESSAGE: &str = "No responder found for this patient.";
pub const VOICE_FAILURE_MESSAGE: &str = "Failed to render voice prompt.";

#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or failed validation (400)
    BadRequest(String),
    /// No responder for the patient (404)
    NotFound(String),
    /// Server-side problem before any dispatch, e.g. missing base URL (500)
    Internal { message: &'static str, error: String },
    /// Dispatch ran but a channel failed (500)
    Dispatch(DispatchResult),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidRequest(e) => ApiError::BadRequest(e),
            Error::ResponderNotFound(patient_id) => ApiError::NotFound(patient_id),
            Error::Config(e) => ApiError::Internal {
                message: DispatchResult::FAILURE_MESSAGE,
                error: format!("Configuration error: {}", e),
            },
            Error::Markup(e) => ApiError::Internal {
                message: VOICE_FAILURE_MESSAGE,
                error: e,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(e) => {
                warn!("Rejected alert request: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": INVALID_REQUEST_MESSAGE, "error": e })),
                )
                    .into_response()
            }
            ApiError::NotFound(patient_id) => {
                warn!("No responder found for patient {}", patient_id);
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "message": NOT_FOUND_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Internal { message, error } => {
                error!("{} {}", message, error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": message, "error": error })),
                )
                    .into_response()
            }
            ApiError::Dispatch(result) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": result.message,
                    "error": result.error_detail,
                    "alertId": result.alert_id,
                    "channels": result.channels,
                })),
            )
                .into_response(),
        }
    }
}
