//! # LifeConnect Infra-Common
//!
//! Shared infrastructure for the LifeConnect crates: tracing subscriber setup
//! and the error type it reports through.

pub mod errors;
pub mod logging;

pub use errors::{Error, Result};
pub use logging::{setup_logging, LoggingConfig};
