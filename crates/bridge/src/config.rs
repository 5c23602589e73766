//! Bridge configuration

use crate::error::ConfigError;
use alloy_primitives::{Address, ChainId, address};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// The account exposed when none is configured.
pub const DEFAULT_ACCOUNT: Address = address!("0x991c468AbcE2b4DD627a6210C145373EbABdd186");

/// Mainnet.
pub const DEFAULT_CHAIN_ID: ChainId = 1;

/// Default time a handler gets to settle, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Configures the session seed and dispatch limits of a bridge.
///
/// Values are layered: built-in defaults, then `widget-bridge.toml` (or the file passed to
/// [`BridgeConfig::load_with_file`]), then `WIDGET_BRIDGE_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// The account returned by `eth_accounts`
    pub account: Address,
    /// The chain the session starts on
    pub chain_id: ChainId,
    /// Seconds a handler may take before the widget gets a timeout error, `0` disables the limit
    pub request_timeout: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT,
            chain_id: DEFAULT_CHAIN_ID,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    /// The default config file name
    pub const FILE_NAME: &'static str = "widget-bridge.toml";

    /// Prefix of the environment variables that override the config
    pub const ENV_PREFIX: &'static str = "WIDGET_BRIDGE_";

    /// Loads the config from `widget-bridge.toml` in the working directory and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_file(Self::FILE_NAME)
    }

    /// Loads the config from the given TOML file and the environment.
    ///
    /// A missing file is not an error.
    pub fn load_with_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Returns the [Figment] the config is extracted from.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Sets the account exposed to the widget
    #[must_use]
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = account;
        self
    }

    /// Sets the chain the session starts on
    #[must_use]
    pub fn with_chain_id<U: Into<u64>>(mut self, chain_id: U) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// Sets the request timeout, `None` disables it
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout.map(|t| t.as_secs().max(1)).unwrap_or_default();
        self
    }

    /// Returns the request timeout, if enabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }
}
