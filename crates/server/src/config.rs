//! Application configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `lifeconnect.toml` in the working directory
//!    when present)
//! 3. `LIFECONNECT__SECTION__KEY` environment variables, e.g.
//!    `LIFECONNECT__DISPATCH__PROVIDER__ACCOUNT_SID`
//! 4. the flat variables used by existing deployments: `PUBLIC_BASE_URL`,
//!    `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_PHONE_NUMBER`, `PORT`
//!
//! The result is built once at startup and passed down; request handling
//! never reads the environment.

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use lifeconnect_dispatch_core::DispatchConfig;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3001";
const DEFAULT_CONFIG_FILE: &str = "lifeconnect";
const ENV_PREFIX: &str = "LIFECONNECT";

/// Legacy variable name -> configuration key
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PUBLIC_BASE_URL", "dispatch.public_base_url"),
    ("TWILIO_ACCOUNT_SID", "dispatch.provider.account_sid"),
    ("TWILIO_AUTH_TOKEN", "dispatch.provider.auth_token"),
    ("TWILIO_PHONE_NUMBER", "dispatch.provider.from_number"),
];

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// HTTP listener and logging
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load from the process environment and an optional file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(path, &env)
    }

    /// Load using `env` in place of the process environment.
    pub fn load_from(path: Option<&Path>, env: &HashMap<String, String>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let namespaced: config::Map<String, String> = env
            .iter()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(Some(namespaced)),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, non_empty(env.get(*var)))?;
        }
        builder = builder.set_override_option(
            "server.bind_address",
            non_empty(env.get("PORT")).map(|port| format!("0.0.0.0:{}", port)),
        )?;

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
