use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::dashboard::PollInterval;

/// Address watched when none is configured.
pub const DEFAULT_ADDRESS: &str = "0xf89d7b9c864f589bbF53a82105107622B35EaA40";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub rpc: RpcSettings,
    pub account: AccountSettings,
    pub poller: PollerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,
    #[serde(default = "default_cors_methods")]
    pub cors_allow_methods: String,
    #[serde(default = "default_cors_headers")]
    pub cors_allow_headers: String,
}

fn default_title() -> String {
    "ETH MAINNET DATA".to_string()
}

// Default functions for CORS settings
fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_cors_methods() -> String {
    "GET, OPTIONS".to_string()
}

fn default_cors_headers() -> String {
    "Content-Type".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcSettings {
    pub url: String,
    #[serde(default = "default_rpc_timeout")]
    pub timeout_seconds: u64,
}

fn default_rpc_timeout() -> u64 {
    10
}

impl RpcSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountSettings {
    pub address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerSettings {
    pub min_interval_seconds: u64,
    pub max_interval_seconds: u64,
}

impl PollerSettings {
    pub fn interval(&self) -> PollInterval {
        PollInterval::from_secs(self.min_interval_seconds, self.max_interval_seconds)
    }
}

impl Settings {
    /// Loads `config.yaml` (optional) and the environment on top of the defaults.
    ///
    /// Nested keys use `__` as separator, e.g. `RPC__URL` or `POLLER__MAX_INTERVAL_SECONDS`.
    /// A plain `RPC_URL` is honoured as well.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Self::builder()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(Environment::default().separator("__"));

        if let Ok(url) = env::var("RPC_URL") {
            builder = builder.set_override("rpc.url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Settings made of the built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("rpc.url", "http://localhost:8545")?
            .set_default("rpc.timeout_seconds", 10)?
            .set_default("account.address", DEFAULT_ADDRESS)?
            .set_default("poller.min_interval_seconds", 3)?
            .set_default("poller.max_interval_seconds", 15)
    }
}
