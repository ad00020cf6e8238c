//! Developer-friendly facade layer.
//!
//! [`ExtensionApi`] is the one entry point callers use. Construct it once at
//! startup and pass clones to whatever needs capabilities; all clones share
//! the same broker client and therefore the same provider activation.

pub mod accessors;
pub mod prelude;

pub use accessors::{ClusterProviderFacade, CommandTargetFacade, ExplorerTreeFacade, KubectlFacade};

use std::sync::Arc;

use crate::client::{AcquisitionSnapshot, BrokerClient};
use crate::host::{HostActivator, RawApi};
use crate::protocol::{ApiResult, ComponentId, VersionId};
use crate::registry::CapabilityKind;
use crate::Result;

/// Top-level facade over a [`BrokerClient`].
#[derive(Clone)]
pub struct ExtensionApi {
    client: Arc<BrokerClient>,
    cluster_provider: ClusterProviderFacade,
    kubectl: KubectlFacade,
    command_target: CommandTargetFacade,
    explorer_tree: ExplorerTreeFacade,
}

impl ExtensionApi {
    pub fn new(client: BrokerClient) -> Self {
        let client = Arc::new(client);
        Self {
            cluster_provider: ClusterProviderFacade::new(Arc::clone(&client)),
            kubectl: KubectlFacade::new(Arc::clone(&client)),
            command_target: CommandTargetFacade::new(Arc::clone(&client)),
            explorer_tree: ExplorerTreeFacade::new(Arc::clone(&client)),
            client,
        }
    }

    /// Facade over a client configured from the environment.
    pub fn with_activator(activator: Arc<dyn HostActivator>) -> Result<Self> {
        Ok(Self::new(BrokerClient::new(activator)?))
    }

    pub fn client(&self) -> &BrokerClient {
        &self.client
    }

    pub fn state(&self) -> AcquisitionSnapshot {
        self.client.state()
    }

    pub fn cluster_provider(&self) -> &ClusterProviderFacade {
        &self.cluster_provider
    }

    pub fn kubectl(&self) -> &KubectlFacade {
        &self.kubectl
    }

    pub fn command_target(&self) -> &CommandTargetFacade {
        &self.command_target
    }

    pub fn explorer_tree(&self) -> &ExplorerTreeFacade {
        &self.explorer_tree
    }

    /// See [`BrokerClient::get`].
    pub async fn get<T>(&self) -> Result<ApiResult<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.client.get::<T>().await
    }

    /// See [`BrokerClient::get_kind`].
    pub async fn get_kind(&self, kind: CapabilityKind) -> Result<ApiResult<RawApi>> {
        self.client.get_kind(kind).await
    }

    /// See [`BrokerClient::get_core`].
    pub async fn get_core(
        &self,
        component: impl Into<ComponentId>,
        version: impl Into<VersionId>,
    ) -> Result<ApiResult<RawApi>> {
        self.client.get_core(component, version).await
    }
}
