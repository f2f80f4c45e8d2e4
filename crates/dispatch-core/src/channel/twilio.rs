//! Twilio REST client for SMS and voice calls

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::CommunicationProvider;
use crate::error::{ChannelError, Error, Result};
use crate::types::PhoneNumber;

pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";
const API_VERSION: &str = "2010-04-01";

/// Twilio account settings
#[derive(Clone, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    /// Sending number, E.164
    #[serde(default)]
    pub from_number: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Transport timeout per request; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Check that credentials and sender are present.
    pub fn validate(&self) -> Result<PhoneNumber> {
        if self.account_sid.trim().is_empty() || self.auth_token.trim().is_empty() {
            return Err(Error::Config(
                "Twilio account SID and auth token must be provided".to_string(),
            ));
        }
        if self.from_number.trim().is_empty() {
            return Err(Error::Config("Twilio phone number must be provided".to_string()));
        }
        url::Url::parse(&self.api_base_url).map_err(|e| {
            Error::Config(format!("Invalid Twilio API URL '{}': {}", self.api_base_url, e))
        })?;
        PhoneNumber::parse(&self.from_number)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// [`CommunicationProvider`] backed by the Twilio REST API.
pub struct TwilioProvider {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: PhoneNumber,
    api_base_url: String,
}

impl TwilioProvider {
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let from = config.validate()?;

        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            account_sid: config.account_sid,
            auth_token: config.auth_token,
            from,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_number(&self) -> &PhoneNumber {
        &self.from
    }

    fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/{}/Accounts/{}/{}.json",
            self.api_base_url, API_VERSION, self.account_sid, resource
        )
    }

    async fn create(
        &self,
        resource: &str,
        form: &[(&str, &str)],
    ) -> std::result::Result<String, ChannelError> {
        let url = self.resource_url(resource);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        if status.is_success() {
            let created: CreatedResource = serde_json::from_str(&body)
                .map_err(|e| ChannelError::InvalidResponse(e.to_string()))?;
            return Ok(created.sid);
        }

        let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
        let code = parsed.as_ref().and_then(|b| b.code);
        let message = parsed
            .and_then(|b| b.message)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unknown error".to_string());

        Err(ChannelError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl CommunicationProvider for TwilioProvider {
    async fn send_text_message(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> std::result::Result<String, ChannelError> {
        let form = [("To", to.as_str()), ("From", self.from.as_str()), ("Body", body)];
        match self.create("Messages", &form).await {
            Ok(sid) => {
                info!("SMS sent to {} ({})", to, sid);
                Ok(sid)
            }
            Err(e) => {
                error!("Error sending SMS to {}: {}", to, e);
                Err(e)
            }
        }
    }

    async fn place_voice_call(
        &self,
        to: &PhoneNumber,
        callback_url: &str,
    ) -> std::result::Result<String, ChannelError> {
        let form = [("To", to.as_str()), ("From", self.from.as_str()), ("Url", callback_url)];
        match self.create("Calls", &form).await {
            Ok(sid) => {
                info!("Call initiated to {} ({})", to, sid);
                Ok(sid)
            }
            Err(e) => {
                error!("Error making call to {}: {}", to, e);
                Err(e)
            }
        }
    }
}
