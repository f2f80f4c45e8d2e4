//! Outbound communication channels
//!
//! The dispatcher only sees [`CommunicationProvider`]; the concrete provider is
//! chosen when the service is assembled.

pub mod twilio;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::types::PhoneNumber;

pub use twilio::{TwilioConfig, TwilioProvider};

/// The two capabilities consumed from a communications provider.
///
/// Both return the provider's reference for the created resource (message or
/// call SID) on success.
#[async_trait]
pub trait CommunicationProvider: Send + Sync {
    /// Send a text message with `body` to `to`.
    async fn send_text_message(&self, to: &PhoneNumber, body: &str) -> Result<String, ChannelError>;

    /// Place a voice call to `to`; the provider fetches the spoken content
    /// from `callback_url` once the call is answered.
    async fn place_voice_call(
        &self,
        to: &PhoneNumber,
        callback_url: &str,
    ) -> Result<String, ChannelError>;
}
