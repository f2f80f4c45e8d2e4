//! Shared test doubles for dispatch-core integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use lifeconnect_dispatch_core::{
    AlertIntake, ChannelError, CommunicationProvider, NotificationDispatcher, PhoneNumber,
    StaticResponderDirectory,
};
use parking_lot::Mutex;

pub const RESPONDER: &str = "+918074741601";
pub const PATIENT: &str = "12345";
pub const BASE_URL: &str = "https://example.com";

/// One call made against the stub provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Sms { to: String, body: String },
    Voice { to: String, callback_url: String },
}

/// Provider that records every call and fails on demand.
#[derive(Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<ProviderCall>>,
    sms_failure: Option<ChannelError>,
    voice_failure: Option<ChannelError>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sms(error: ChannelError) -> Self {
        Self {
            sms_failure: Some(error),
            ..Self::default()
        }
    }

    pub fn failing_voice(error: ChannelError) -> Self {
        Self {
            voice_failure: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    pub fn sms_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, ProviderCall::Sms { .. })).count()
    }

    pub fn voice_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, ProviderCall::Voice { .. })).count()
    }
}

#[async_trait]
impl CommunicationProvider for RecordingProvider {
    async fn send_text_message(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<String, ChannelError> {
        let sid = {
            let mut calls = self.calls.lock();
            calls.push(ProviderCall::Sms {
                to: to.to_string(),
                body: body.to_string(),
            });
            format!("SM{:04}", calls.len())
        };
        match &self.sms_failure {
            Some(e) => Err(e.clone()),
            None => Ok(sid),
        }
    }

    async fn place_voice_call(
        &self,
        to: &PhoneNumber,
        callback_url: &str,
    ) -> Result<String, ChannelError> {
        let sid = {
            let mut calls = self.calls.lock();
            calls.push(ProviderCall::Voice {
                to: to.to_string(),
                callback_url: callback_url.to_string(),
            });
            format!("CA{:04}", calls.len())
        };
        match &self.voice_failure {
            Some(e) => Err(e.clone()),
            None => Ok(sid),
        }
    }
}

pub fn directory() -> StaticResponderDirectory {
    StaticResponderDirectory::default().with_entry(PATIENT, PhoneNumber::parse(RESPONDER).unwrap())
}

/// Intake wired to `provider` with the single test responder.
pub fn intake(provider: Arc<RecordingProvider>, base_url: Option<&str>) -> AlertIntake {
    AlertIntake::new(
        Arc::new(directory()),
        NotificationDispatcher::new(provider),
        base_url.map(str::to_string),
    )
}

pub fn auth_error() -> ChannelError {
    ChannelError::Rejected {
        status: 401,
        code: Some(20003),
        message: "Authenticate".to_string(),
    }
}
