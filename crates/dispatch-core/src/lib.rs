//! # LifeConnect Dispatch-Core
//!
//! Emergency alert dispatch for the LifeConnect backend.
//!
//! An SOS from the browser flows through three pieces:
//!
//! - [`AlertIntake`] validates the request, resolves the patient's responder
//!   through a [`ResponderDirectory`] and builds the SMS text and the voice
//!   callback URL.
//! - [`NotificationDispatcher`] sends the SMS and then places the voice call
//!   through a [`CommunicationProvider`], reporting the outcome per channel.
//! - [`voice`] renders the spoken prompt the provider fetches back once the
//!   call connects.
//!
//! ```no_run
//! use std::sync::Arc;
//! use lifeconnect_dispatch_core::{
//!     AlertIntake, AlertRequest, Location, NotificationDispatcher,
//!     StaticResponderDirectory, TwilioConfig, TwilioProvider, default_responders,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = TwilioProvider::new(TwilioConfig::new("AC...", "token", "+15005550006"))?;
//! let directory = StaticResponderDirectory::from_config(&default_responders())?;
//! let intake = AlertIntake::new(
//!     Arc::new(directory),
//!     NotificationDispatcher::new(Arc::new(provider)),
//!     Some("https://example.com".to_string()),
//! );
//!
//! let result = intake
//!     .submit_alert(AlertRequest::new("12345", Location::coordinates(17.38, 78.48)))
//!     .await?;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod intake;
pub mod types;
pub mod voice;

pub use channel::{CommunicationProvider, TwilioConfig, TwilioProvider};
pub use config::DispatchConfig;
pub use directory::{default_responders, ResponderDirectory, StaticResponderDirectory};
pub use dispatcher::NotificationDispatcher;
pub use error::{ChannelError, Error, Result};
pub use intake::AlertIntake;
pub use types::{
    AlertRequest, Channel, ChannelOutcome, ChannelReport, Coordinates, DispatchResult, Location,
    PhoneNumber,
};
pub use voice::{render_prompt, render_voice_response};

/// Assemble an [`AlertIntake`] from configuration, talking to Twilio.
///
/// Fails if provider credentials or the responder table are unusable. A
/// missing public base URL is only reported per alert.
pub fn build_intake(config: &DispatchConfig) -> Result<AlertIntake> {
    let provider = TwilioProvider::new(config.provider.clone())?;
    let directory = StaticResponderDirectory::from_config(&config.responders)?;

    if config.public_base_url_is_placeholder() {
        tracing::warn!("Public base URL is not configured; alerts will fail until it is set");
    }

    Ok(AlertIntake::new(
        std::sync::Arc::new(directory),
        NotificationDispatcher::new(std::sync::Arc::new(provider)),
        config.public_base_url.clone(),
    ))
}
