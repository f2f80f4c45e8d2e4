//! Tests for the two-step notification dispatch

mod common;

use std::sync::Arc;

use common::{auth_error, ProviderCall, RecordingProvider, RESPONDER};
use lifeconnect_dispatch_core::{
    Channel, ChannelError, ChannelOutcome, DispatchResult, NotificationDispatcher, PhoneNumber,
};
use pretty_assertions::assert_eq;

const CALLBACK: &str = "https://example.com/api/voice?patientId=12345";

fn responder() -> PhoneNumber {
    PhoneNumber::parse(RESPONDER).unwrap()
}

#[tokio::test]
async fn test_both_channels_succeed() {
    let provider = Arc::new(RecordingProvider::new());
    let dispatcher = NotificationDispatcher::new(provider.clone());

    let result = dispatcher.dispatch(&responder(), "help", CALLBACK).await;

    assert!(result.success);
    assert_eq!(result.message, DispatchResult::SUCCESS_MESSAGE);
    assert_eq!(result.channels.len(), 2);
    assert!(result.channels.iter().all(|r| r.is_sent()));
    assert_eq!(
        result.channel(Channel::Sms).unwrap().outcome,
        ChannelOutcome::Sent { provider_ref: "SM0001".into() }
    );
    assert_eq!(
        result.channel(Channel::Voice).unwrap().outcome,
        ChannelOutcome::Sent { provider_ref: "CA0002".into() }
    );
}

#[tokio::test]
async fn test_sms_failure_skips_call() {
    let provider = Arc::new(RecordingProvider::failing_sms(auth_error()));
    let dispatcher = NotificationDispatcher::new(provider.clone());

    let result = dispatcher.dispatch(&responder(), "help", CALLBACK).await;

    assert!(!result.success);
    assert_eq!(result.message, DispatchResult::FAILURE_MESSAGE);
    assert!(result.error_detail.as_deref().unwrap().contains("Authenticate"));
    assert!(!result.sms_delivered());
    assert_eq!(result.channel(Channel::Voice).unwrap().outcome, ChannelOutcome::Skipped);

    assert_eq!(provider.sms_count(), 1);
    assert_eq!(provider.voice_count(), 0);
}

#[tokio::test]
async fn test_call_failure_after_sms_is_partial() {
    let provider = Arc::new(RecordingProvider::failing_voice(ChannelError::Transport(
        "connection reset".into(),
    )));
    let dispatcher = NotificationDispatcher::new(provider.clone());

    let result = dispatcher.dispatch(&responder(), "help", CALLBACK).await;

    assert!(!result.success);
    assert!(result.sms_delivered());
    assert_eq!(
        result.error_detail.as_deref(),
        Some("Transport error: connection reset")
    );
    assert_eq!(
        result.channel(Channel::Voice).unwrap().outcome,
        ChannelOutcome::Failed { error: "Transport error: connection reset".into() }
    );
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn test_same_number_and_content_reach_provider() {
    let provider = Arc::new(RecordingProvider::new());
    let dispatcher = NotificationDispatcher::new(provider.clone());

    dispatcher.dispatch(&responder(), "Emergency: Patient 12345", CALLBACK).await;

    assert_eq!(
        provider.calls(),
        vec![
            ProviderCall::Sms {
                to: RESPONDER.into(),
                body: "Emergency: Patient 12345".into(),
            },
            ProviderCall::Voice {
                to: RESPONDER.into(),
                callback_url: CALLBACK.into(),
            },
        ]
    );
}

#[tokio::test]
async fn test_each_dispatch_gets_its_own_alert_id() {
    let provider = Arc::new(RecordingProvider::new());
    let dispatcher = NotificationDispatcher::new(provider);

    let a = dispatcher.dispatch(&responder(), "help", CALLBACK).await;
    let b = dispatcher.dispatch(&responder(), "help", CALLBACK).await;

    assert_ne!(a.alert_id, b.alert_id);
}
