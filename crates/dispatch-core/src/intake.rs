//! Alert intake: validate an SOS, resolve its responder and hand it to the
//! dispatcher.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;
use validator::Validate;

use crate::config::is_placeholder_base_url;
use crate::directory::ResponderDirectory;
use crate::dispatcher::NotificationDispatcher;
use crate::error::{Error, Result};
use crate::types::{AlertRequest, DispatchResult, Location};

/// Path of the voice-prompt endpoint the provider calls back.
pub const VOICE_CALLBACK_PATH: &str = "/api/voice";

pub struct AlertIntake {
    directory: Arc<dyn ResponderDirectory>,
    dispatcher: NotificationDispatcher,
    public_base_url: Option<String>,
}

impl AlertIntake {
    pub fn new(
        directory: Arc<dyn ResponderDirectory>,
        dispatcher: NotificationDispatcher,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            directory,
            dispatcher,
            public_base_url,
        }
    }

    /// Process one SOS press.
    ///
    /// Validation, responder lookup and callback URL construction all happen
    /// before the dispatcher is invoked, so an `Err` here means no message was
    /// sent. Channel failures come back as `Ok` with `success == false`.
    pub async fn submit_alert(&self, request: AlertRequest) -> Result<DispatchResult> {
        request
            .validate()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        let AlertRequest { patient_id, location } = request;
        info!("Alert received for patient {} at location: {}", patient_id, location);

        let phone = self
            .directory
            .resolve(&patient_id)
            .await
            .ok_or_else(|| {
                warn!("No responder registered for patient {}", patient_id);
                Error::ResponderNotFound(patient_id.clone())
            })?;

        let message = alert_message(&patient_id, &location);
        let callback_url = voice_callback_url(self.public_base_url.as_deref(), &patient_id)?;

        Ok(self.dispatcher.dispatch(&phone, &message, &callback_url).await)
    }
}

/// Human-readable SMS body.
pub fn alert_message(patient_id: &str, location: &Location) -> String {
    match location {
        Location::Coordinates(_) => format!(
            "Emergency: Patient {} needs assistance at {}.",
            patient_id,
            location.map_link()
        ),
        Location::Address(address) => format!(
            "Emergency: Patient {} needs assistance at {} ({}).",
            patient_id,
            address.trim(),
            location.map_link()
        ),
    }
}

/// Parse the configured public base URL.
///
/// The result is an http(s) URL with no query or fragment, so callback paths
/// can be appended to it.
pub fn validate_public_base_url(base: Option<&str>) -> Result<Url> {
    let base = base.map(str::trim).unwrap_or_default();
    if base.is_empty() {
        return Err(Error::Config("public base URL is not set".to_string()));
    }

    let parsed = Url::parse(base)
        .map_err(|e| Error::Config(format!("public base URL '{}' is invalid: {}", base, e)))?;
    if is_placeholder_base_url(&parsed) {
        return Err(Error::Config(
            "public base URL is still set to its placeholder value".to_string(),
        ));
    }
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(Error::Config(format!(
            "public base URL '{}' must be an http or https URL",
            base
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::Config(format!(
            "public base URL '{}' must not carry a query or fragment",
            base
        )));
    }

    Ok(parsed)
}

/// URL the voice provider fetches spoken content from.
pub fn voice_callback_url(base: Option<&str>, patient_id: &str) -> Result<String> {
    let mut url = validate_public_base_url(base)?;
    url
        .path_segments_mut()
        .map_err(|_| Error::Config("public base URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(VOICE_CALLBACK_PATH.split('/').filter(|s| !s.is_empty()));
    url.query_pairs_mut().append_pair("patientId", patient_id);
    Ok(url.into())
}
