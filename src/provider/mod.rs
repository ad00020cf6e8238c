//! 提供方代理：提供方一侧对描述符请求的应答表。
//!
//! Provider-side broker.
//!
//! A provider answers descriptor requests from a fixed table: descriptors it
//! implements, and descriptors it used to implement but has retired. Anything
//! else is a version it has never heard of.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::host::{into_raw_api, RawApi, RawBroker};
use crate::protocol::{
    ApiResult, CapabilityDescriptor, ComponentId, UnavailabilityReason, VersionId,
};
use crate::registry::CapabilityRegistry;

/// A [`RawBroker`] backed by a static table of offered and retired descriptors.
#[derive(Default)]
pub struct ProviderBroker {
    offered: HashMap<CapabilityDescriptor, RawApi>,
    retired: HashSet<CapabilityDescriptor>,
}

impl ProviderBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `api` for `descriptor`. The same object is returned on every request.
    pub fn offer(mut self, descriptor: CapabilityDescriptor, api: RawApi) -> Self {
        self.retired.remove(&descriptor);
        self.offered.insert(descriptor, api);
        self
    }

    /// Serve a capability handle under the descriptor the registry assigns to `T`.
    ///
    /// Handles of unregistered types are ignored.
    pub fn offer_capability<T: Send + Sync + 'static>(self, handle: T) -> Self {
        let descriptor = CapabilityRegistry::global().descriptor_for::<T>();
        if descriptor.is_invalid() {
            tracing::warn!(
                interface = std::any::type_name::<T>(),
                "ignoring offer of unregistered capability type"
            );
            return self;
        }
        self.offer(descriptor, into_raw_api(handle))
    }

    /// Report `descriptor` as removed from now on.
    pub fn retire(mut self, descriptor: CapabilityDescriptor) -> Self {
        self.offered.remove(&descriptor);
        self.retired.insert(descriptor);
        self
    }

    pub fn offers(&self, descriptor: &CapabilityDescriptor) -> bool {
        self.offered.contains_key(descriptor)
    }
}

impl RawBroker for ProviderBroker {
    fn get(&self, component: &ComponentId, version: &VersionId) -> ApiResult<RawApi> {
        let descriptor = CapabilityDescriptor::new(component.clone(), version.clone());
        let result = if let Some(api) = self.offered.get(&descriptor) {
            ApiResult::available(api.clone())
        } else if self.retired.contains(&descriptor) {
            ApiResult::unavailable(UnavailabilityReason::VersionRemoved)
        } else {
            ApiResult::unavailable(UnavailabilityReason::VersionUnknown)
        };
        debug!(
            component = %component,
            version = %version,
            available = result.is_available(),
            "provider answered capability request"
        );
        result
    }
}
