//! Request handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use lifeconnect_dispatch_core::{
    render_prompt, render_voice_response, AlertRequest, ChannelReport,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::ApiError;
use super::ApiState;

pub const GREETING: &str = "Hello from the LifeConnect Backend!";
pub const TWIML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Liveness placeholder.
pub async fn greeting() -> &'static str {
    GREETING
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAccepted {
    pub message: String,
    pub alert_id: Uuid,
    pub channels: Vec<ChannelReport>,
}

/// `POST /api/send-alert`
pub async fn send_alert(
    State(state): State<ApiState>,
    payload: Result<Json<AlertRequest>, JsonRejection>,
) -> Result<Json<AlertAccepted>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let result = state.intake.submit_alert(request).await?;
    if !result.success {
        return Err(ApiError::Dispatch(result));
    }

    Ok(Json(AlertAccepted {
        message: result.message,
        alert_id: result.alert_id,
        channels: result.channels,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    #[serde(rename = "patientId")]
    pub patient_id: Option<String>,
}

/// `GET|POST /api/voice?patientId=…`, fetched by the voice provider once the
/// call connects.
pub async fn voice_prompt(Query(query): Query<VoiceQuery>) -> Result<Response, ApiError> {
    debug!("Voice prompt requested for patient {:?}", query.patient_id);

    let prompt = render_prompt(query.patient_id.as_deref());
    let twiml = render_voice_response(&prompt)?;

    Ok(([(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)], twiml).into_response())
}
