//! Versioned accessor facades, one per known component.
//!
//! Each fixes the component and the newest version this release knows, so
//! callers write `api.kubectl().v1().await` instead of naming descriptors.

use std::sync::Arc;

use crate::capabilities::v1::{
    ClusterProviderV1Api, CommandTargetV1Api, ExplorerTreeV1Api, KubectlV1Api,
};
use crate::client::BrokerClient;
use crate::protocol::{ids, ApiResult};
use crate::Result;

/// Access to the `clusterprovider` component.
#[derive(Clone)]
pub struct ClusterProviderFacade {
    client: Arc<BrokerClient>,
}

impl ClusterProviderFacade {
    pub const COMPONENT: &'static str = ids::CLUSTER_PROVIDER;

    pub(crate) fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }

    pub async fn v1(&self) -> Result<ApiResult<ClusterProviderV1Api>> {
        self.client.get::<ClusterProviderV1Api>().await
    }
}

/// Access to the `kubectl` component.
#[derive(Clone)]
pub struct KubectlFacade {
    client: Arc<BrokerClient>,
}

impl KubectlFacade {
    pub const COMPONENT: &'static str = ids::KUBECTL;

    pub(crate) fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }

    pub async fn v1(&self) -> Result<ApiResult<KubectlV1Api>> {
        self.client.get::<KubectlV1Api>().await
    }
}

/// Access to the `commandtarget` component.
#[derive(Clone)]
pub struct CommandTargetFacade {
    client: Arc<BrokerClient>,
}

impl CommandTargetFacade {
    pub const COMPONENT: &'static str = ids::COMMAND_TARGET;

    pub(crate) fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }

    pub async fn v1(&self) -> Result<ApiResult<CommandTargetV1Api>> {
        self.client.get::<CommandTargetV1Api>().await
    }
}

/// Access to the `explorertree` component.
#[derive(Clone)]
pub struct ExplorerTreeFacade {
    client: Arc<BrokerClient>,
}

impl ExplorerTreeFacade {
    pub const COMPONENT: &'static str = ids::EXPLORER_TREE;

    pub(crate) fn new(client: Arc<BrokerClient>) -> Self {
        Self { client }
    }

    pub async fn v1(&self) -> Result<ApiResult<ExplorerTreeV1Api>> {
        self.client.get::<ExplorerTreeV1Api>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ComponentId;
    use crate::registry::{CapabilityKind, CapabilityRegistry};

    #[test]
    fn test_facades_target_latest_registered_version() {
        let reg = CapabilityRegistry::global();
        let cases = [
            (ClusterProviderFacade::COMPONENT, CapabilityKind::ClusterProviderV1),
            (KubectlFacade::COMPONENT, CapabilityKind::KubectlV1),
            (CommandTargetFacade::COMPONENT, CapabilityKind::CommandTargetV1),
            (ExplorerTreeFacade::COMPONENT, CapabilityKind::ExplorerTreeV1),
        ];
        for (component, kind) in cases {
            let latest = reg
                .latest_version(&ComponentId::from_static(component))
                .unwrap();
            assert_eq!(kind.descriptor().version, latest, "{}", component);
            assert_eq!(kind.descriptor().component.as_str(), component);
        }
    }
}
