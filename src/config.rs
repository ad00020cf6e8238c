//! Broker configuration.

use serde::Deserialize;

use crate::{Error, ErrorContext, Result};

/// Environment variable overriding [`BrokerConfig::provider_id`].
pub const PROVIDER_ID_ENV: &str = "CAPABILITY_BROKER_PROVIDER_ID";

/// Well-known identifier of the provider module.
pub const DEFAULT_PROVIDER_ID: &str = "kubernetes-tools.provider";

/// Configuration for a [`crate::BrokerClient`].
///
/// Deserializable so hosts can embed it in their own config files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerConfig {
    /// Identifier the host resolves to the provider module.
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
}

fn default_provider_id() -> String {
    DEFAULT_PROVIDER_ID.to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            provider_id: default_provider_id(),
        }
    }
}

impl BrokerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `CAPABILITY_BROKER_PROVIDER_ID` when set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var(PROVIDER_ID_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                config.provider_id = v.to_string();
            }
        }
        config
    }

    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider_id.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "provider id must not be empty",
                ErrorContext::new()
                    .with_field_path("provider_id")
                    .with_source("broker_config"),
            ));
        }
        Ok(())
    }
}
