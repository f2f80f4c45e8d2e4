//! Dispatch configuration

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::channel::TwilioConfig;
use crate::directory::default_responders;

/// Sample value shipped in documentation and `.env` templates. Treated the
/// same as an unset base URL.
pub const PUBLIC_BASE_URL_PLACEHOLDER: &str = "https://your-public-url.example.com";

/// Everything the dispatch core needs, built once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Publicly reachable base URL of this service, used for voice callbacks.
    /// Checked per alert, not at startup.
    #[serde(default)]
    pub public_base_url: Option<String>,

    #[serde(default = "default_provider")]
    pub provider: TwilioConfig,

    /// patientId -> responder phone (E.164)
    #[serde(default = "default_responders")]
    pub responders: HashMap<String, String>,
}

fn default_provider() -> TwilioConfig {
    TwilioConfig::new("", "", "")
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new(default_provider())
    }
}

impl DispatchConfig {
    pub fn new(provider: TwilioConfig) -> Self {
        Self {
            public_base_url: None,
            provider,
            responders: default_responders(),
        }
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// True when the base URL is missing or left at its placeholder.
    pub fn public_base_url_is_placeholder(&self) -> bool {
        match self.public_base_url.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(url) => Url::parse(url).is_ok_and(|url| is_placeholder_base_url(&url)),
        }
    }
}

/// True when `url` points at the placeholder host. Scheme and host are
/// compared after parsing, so case and trailing slashes do not matter.
pub fn is_placeholder_base_url(url: &Url) -> bool {
    Url::parse(PUBLIC_BASE_URL_PLACEHOLDER)
        .is_ok_and(|placeholder| placeholder.host_str() == url.host_str())
}
