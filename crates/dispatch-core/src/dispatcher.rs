//! Notification dispatch
//!
//! One dispatch is a two-step pipeline against a single responder number:
//! the text message goes out first, and the voice call is placed only once the
//! provider has accepted the text. A failure in either step fails the whole
//! dispatch, but the per-channel reports in [`DispatchResult`] say which step
//! got through.
//!
//! There is no retry, timeout or de-duplication at this level; each call to
//! [`NotificationDispatcher::dispatch`] is independent.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::channel::CommunicationProvider;
use crate::error::ChannelError;
use crate::types::{Channel, ChannelOutcome, ChannelReport, DispatchResult, PhoneNumber};

/// Owns the outbound channel capabilities.
#[derive(Clone)]
pub struct NotificationDispatcher {
    provider: Arc<dyn CommunicationProvider>,
}

impl NotificationDispatcher {
    pub fn new(provider: Arc<dyn CommunicationProvider>) -> Self {
        Self { provider }
    }

    /// Send `message` by SMS, then call the same number with the voice
    /// content at `voice_callback_url`.
    pub async fn dispatch(
        &self,
        phone: &PhoneNumber,
        message: &str,
        voice_callback_url: &str,
    ) -> DispatchResult {
        let alert_id = Uuid::new_v4();
        let span = info_span!("dispatch", %alert_id, to = %phone);

        async move {
            let mut channels = Vec::with_capacity(2);

            match self.provider.send_text_message(phone, message).await {
                Ok(sid) => {
                    channels.push(ChannelReport::new(
                        Channel::Sms,
                        ChannelOutcome::Sent { provider_ref: sid },
                    ));
                }
                Err(e) => {
                    channels.push(failed(Channel::Sms, &e));
                    channels.push(ChannelReport::new(Channel::Voice, ChannelOutcome::Skipped));
                    error!("Failed to send alert: {}", e);
                    return DispatchResult::failed(alert_id, channels, e.to_string());
                }
            }

            match self.provider.place_voice_call(phone, voice_callback_url).await {
                Ok(sid) => {
                    channels.push(ChannelReport::new(
                        Channel::Voice,
                        ChannelOutcome::Sent { provider_ref: sid },
                    ));
                }
                Err(e) => {
                    channels.push(failed(Channel::Voice, &e));
                    error!("Failed to send alert after SMS was accepted: {}", e);
                    return DispatchResult::failed(alert_id, channels, e.to_string());
                }
            }

            info!("Sending alert to {}", phone);
            DispatchResult::delivered(alert_id, channels)
        }
        .instrument(span)
        .await
    }
}

fn failed(channel: Channel, e: &ChannelError) -> ChannelReport {
    ChannelReport::new(channel, ChannelOutcome::Failed { error: e.to_string() })
}
