use crate::client::core::BrokerClient;
use crate::config::BrokerConfig;
use crate::host::HostActivator;
use crate::registry::CapabilityRegistry;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Builder for creating broker clients.
///
/// Keep this surface area small and predictable.
pub struct BrokerClientBuilder {
    config: Option<BrokerConfig>,
    provider_id: Option<String>,
    activator: Option<Arc<dyn HostActivator>>,
}

impl BrokerClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            provider_id: None,
            activator: None,
        }
    }

    /// Use an explicit configuration instead of reading the environment.
    pub fn config(mut self, config: BrokerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the provider id. Takes precedence over `config`.
    pub fn provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// The host's activation entrypoint (required).
    pub fn activator(mut self, activator: Arc<dyn HostActivator>) -> Self {
        self.activator = Some(activator);
        self
    }

    /// Build the client.
    ///
    /// Fails if the configuration is invalid, no activator was given, or the
    /// capability registry is inconsistent. No activation happens here.
    pub fn build(self) -> Result<BrokerClient> {
        let mut config = self.config.unwrap_or_else(BrokerConfig::from_env);
        if let Some(provider_id) = self.provider_id {
            config.provider_id = provider_id;
        }
        config.validate()?;

        let registry = CapabilityRegistry::global();
        registry.validate().map_err(|gaps| {
            Error::configuration_with_context(
                "capability registry is inconsistent",
                ErrorContext::new()
                    .with_details(
                        gaps.iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    )
                    .with_source("capability_registry"),
            )
        })?;

        let activator = self.activator.ok_or_else(|| {
            Error::configuration_with_context(
                "no host activator configured",
                ErrorContext::new()
                    .with_field_path("activator")
                    .with_source("broker_client_builder"),
            )
        })?;

        tracing::debug!(provider_id = %config.provider_id, "broker client built");
        Ok(BrokerClient::from_parts(config, registry, activator))
    }
}

impl Default for BrokerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
