//! Core types for alert dispatch

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};

static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").unwrap());

/// Base of the map link embedded in alert messages.
pub const MAP_LINK_BASE: &str = "https://maps.google.com/?q=";

/// A phone number in E.164 form, e.g. `+918074741601`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if E164_REGEX.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(Error::Config(format!("'{}' is not an E.164 phone number", raw)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// A latitude/longitude pair as reported by the browser geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Where the patient is.
///
/// Current clients send coordinates; older clients send a free-form address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates(Coordinates),
    Address(String),
}

impl Location {
    pub fn coordinates(lat: f64, lng: f64) -> Self {
        Self::Coordinates(Coordinates { lat, lng })
    }

    /// Map link pointing at this location.
    pub fn map_link(&self) -> String {
        match self {
            Self::Coordinates(c) => format!("{}{},{}", MAP_LINK_BASE, c.lat, c.lng),
            Self::Address(address) => {
                let query: String =
                    url::form_urlencoded::byte_serialize(address.trim().as_bytes()).collect();
                format!("{}{}", MAP_LINK_BASE, query)
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(c) => write!(f, "{},{}", c.lat, c.lng),
            Self::Address(address) => f.write_str(address.trim()),
        }
    }
}

/// One SOS press as received from the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    #[validate(length(min = 1, max = 64), custom(function = "validate_patient_id"))]
    pub patient_id: String,

    #[validate(custom(function = "validate_location"))]
    pub location: Location,
}

impl AlertRequest {
    pub fn new(patient_id: impl Into<String>, location: Location) -> Self {
        Self {
            patient_id: patient_id.into(),
            location,
        }
    }
}

fn validate_patient_id(patient_id: &str) -> std::result::Result<(), ValidationError> {
    if patient_id.trim().is_empty() {
        return Err(ValidationError::new("patient_id_blank"));
    }
    if patient_id.chars().any(char::is_control) {
        return Err(ValidationError::new("patient_id_control_chars"));
    }
    Ok(())
}

fn validate_location(location: &Location) -> std::result::Result<(), ValidationError> {
    match location {
        Location::Coordinates(Coordinates { lat, lng }) => {
            if !lat.is_finite() || !lng.is_finite() {
                return Err(ValidationError::new("coordinates_not_finite"));
            }
            if !(-90.0..=90.0).contains(lat) {
                return Err(ValidationError::new("latitude_out_of_range"));
            }
            if !(-180.0..=180.0).contains(lng) {
                return Err(ValidationError::new("longitude_out_of_range"));
            }
            Ok(())
        }
        Location::Address(address) if address.trim().is_empty() => {
            Err(ValidationError::new("address_blank"))
        }
        Location::Address(_) => Ok(()),
    }
}

/// An outbound communication channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Voice,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sms => f.write_str("sms"),
            Self::Voice => f.write_str("voice"),
        }
    }
}

/// What happened on one channel during a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChannelOutcome {
    Sent {
        #[serde(rename = "providerRef")]
        provider_ref: String,
    },
    Failed {
        error: String,
    },
    /// Not attempted because an earlier step failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub channel: Channel,
    #[serde(flatten)]
    pub outcome: ChannelOutcome,
}

impl ChannelReport {
    pub fn new(channel: Channel, outcome: ChannelOutcome) -> Self {
        Self { channel, outcome }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self.outcome, ChannelOutcome::Sent { .. })
    }
}

/// Outcome of one dispatch sequence. Returned to the caller, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub alert_id: Uuid,
    pub dispatched_at: DateTime<Utc>,
    pub channels: Vec<ChannelReport>,
}

impl DispatchResult {
    pub const SUCCESS_MESSAGE: &'static str =
        "Alert processed successfully. SMS and call will be sent.";
    pub const FAILURE_MESSAGE: &'static str = "Failed to send alert.";

    pub(crate) fn delivered(alert_id: Uuid, channels: Vec<ChannelReport>) -> Self {
        Self {
            success: true,
            message: Self::SUCCESS_MESSAGE.to_string(),
            error_detail: None,
            alert_id,
            dispatched_at: Utc::now(),
            channels,
        }
    }

    pub(crate) fn failed(alert_id: Uuid, channels: Vec<ChannelReport>, detail: String) -> Self {
        Self {
            success: false,
            message: Self::FAILURE_MESSAGE.to_string(),
            error_detail: Some(detail),
            alert_id,
            dispatched_at: Utc::now(),
            channels,
        }
    }

    /// Report for a single channel, if it appears in this result.
    pub fn channel(&self, channel: Channel) -> Option<&ChannelReport> {
        self.channels.iter().find(|r| r.channel == channel)
    }

    /// True when the text message went out, even if the call then failed.
    pub fn sms_delivered(&self) -> bool {
        self.channel(Channel::Sms).is_some_and(ChannelReport::is_sent)
    }
}
