use std::any::type_name;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::acquisition::{Acquisition, AcquisitionSnapshot};
use crate::client::builder::BrokerClientBuilder;
use crate::config::BrokerConfig;
use crate::host::{HostActivator, RawApi};
use crate::protocol::{
    ApiResult, CapabilityDescriptor, ComponentId, UnavailabilityReason, VersionId,
};
use crate::registry::{CapabilityKind, CapabilityRegistry};
use crate::{Error, ErrorContext, Result};

/// Requests capabilities from the provider's broker.
///
/// The provider is activated lazily on the first request. A successful
/// activation is kept for the life of the client; a failed one is retried
/// by the next request.
pub struct BrokerClient {
    config: BrokerConfig,
    registry: &'static CapabilityRegistry,
    acquisition: Acquisition,
}

impl BrokerClient {
    pub fn builder() -> BrokerClientBuilder {
        BrokerClientBuilder::new()
    }

    /// Client with configuration from the environment.
    pub fn new(activator: Arc<dyn HostActivator>) -> Result<Self> {
        BrokerClientBuilder::new().activator(activator).build()
    }

    pub(crate) fn from_parts(
        config: BrokerConfig,
        registry: &'static CapabilityRegistry,
        activator: Arc<dyn HostActivator>,
    ) -> Self {
        let acquisition = Acquisition::new(config.provider_id.clone(), activator);
        Self {
            config,
            registry,
            acquisition,
        }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static CapabilityRegistry {
        self.registry
    }

    /// Snapshot of the provider acquisition state.
    pub fn state(&self) -> AcquisitionSnapshot {
        self.acquisition.snapshot()
    }

    /// Untyped request for `(component, version)`.
    ///
    /// Suspends until the provider is activated (or found missing). An absent
    /// or failed provider yields `extension-not-available`. Only host faults
    /// are returned as `Err`.
    pub async fn get_core(
        &self,
        component: impl Into<ComponentId>,
        version: impl Into<VersionId>,
    ) -> Result<ApiResult<RawApi>> {
        let descriptor = CapabilityDescriptor::new(component, version);
        self.request(&descriptor).await
    }

    /// Typed request for the capability whose handle type is `T`.
    ///
    /// The handle type names both the capability and its version
    /// (`KubectlV1Api` is `kubectl`/`v1`); the descriptor comes from the
    /// capability registry. Types with no registry entry resolve to the
    /// sentinel descriptor and come back as `version-unknown` without
    /// activating the provider. An available object that is not a `T` is
    /// reported as `Error::Validation`.
    pub async fn get<T>(&self) -> Result<ApiResult<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let descriptor = self.registry.descriptor_for::<T>();
        if descriptor.is_invalid() {
            warn!(
                interface = type_name::<T>(),
                "request for an interface with no registry entry"
            );
            return Ok(ApiResult::unavailable(UnavailabilityReason::VersionUnknown));
        }
        let raw = self.request(&descriptor).await?;
        downcast_api::<T>(&descriptor, raw)
    }

    /// Untyped request for the descriptor registered for `kind`.
    ///
    /// Same outcome as [`get_core`](Self::get_core) with that descriptor.
    pub async fn get_kind(&self, kind: CapabilityKind) -> Result<ApiResult<RawApi>> {
        let descriptor = self.registry.descriptor_of(kind);
        self.request(&descriptor).await
    }

    async fn request(&self, descriptor: &CapabilityDescriptor) -> Result<ApiResult<RawApi>> {
        let Some(broker) = self.acquisition.acquire().await? else {
            debug!(
                component = %descriptor.component,
                version = %descriptor.version,
                outcome = UnavailabilityReason::ExtensionNotAvailable.as_str(),
                "capability negotiated"
            );
            return Ok(ApiResult::unavailable(
                UnavailabilityReason::ExtensionNotAvailable,
            ));
        };

        let result = broker.get(&descriptor.component, &descriptor.version);
        debug!(
            component = %descriptor.component,
            version = %descriptor.version,
            outcome = result.reason().map(|r| r.as_str()).unwrap_or("available"),
            "capability negotiated"
        );
        Ok(result)
    }
}

/// Check that an available raw object really is a `T` before exposing it.
fn downcast_api<T>(descriptor: &CapabilityDescriptor, raw: ApiResult<RawApi>) -> Result<ApiResult<T>>
where
    T: Clone + Send + Sync + 'static,
{
    match raw {
        ApiResult::Available { api } => match api.downcast_ref::<T>() {
            Some(handle) => Ok(ApiResult::available(handle.clone())),
            None => {
                warn!(
                    descriptor = %descriptor,
                    expected = type_name::<T>(),
                    "provider returned an object of the wrong shape"
                );
                Err(Error::validation_with_context(
                    format!("provider object for {} has the wrong shape", descriptor),
                    ErrorContext::new()
                        .with_field_path(descriptor.to_string())
                        .with_details(format!("expected {}", type_name::<T>()))
                        .with_source("broker_client"),
                ))
            }
        },
        ApiResult::Unavailable { reason } => Ok(ApiResult::unavailable(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::into_raw_api;

    fn kubectl_v1() -> CapabilityDescriptor {
        CapabilityDescriptor::from_static("kubectl", "v1")
    }

    #[test]
    fn test_downcast_matching_shape() {
        let handle = Arc::new(42_u8);
        let raw = ApiResult::available(into_raw_api(Arc::clone(&handle)));
        let typed = downcast_api::<Arc<u8>>(&kubectl_v1(), raw).unwrap();
        assert!(Arc::ptr_eq(typed.api().unwrap(), &handle));
    }

    #[test]
    fn test_downcast_wrong_shape_is_validation_error() {
        let raw = ApiResult::available(into_raw_api(String::from("not kubectl")));
        let err = downcast_api::<Arc<u8>>(&kubectl_v1(), raw).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("kubectl/v1")
        );
    }

    #[test]
    fn test_downcast_passes_reason_through() {
        let raw = ApiResult::unavailable(UnavailabilityReason::VersionRemoved);
        let typed = downcast_api::<Arc<u8>>(&kubectl_v1(), raw).unwrap();
        assert_eq!(typed.reason(), Some(UnavailabilityReason::VersionRemoved));
    }
}
