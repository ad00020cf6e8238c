use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle type requested through the broker for `clusterprovider/v1`.
pub type ClusterProviderV1Api = Arc<dyn ClusterProviderV1>;

/// Lets other modules add cluster types to the provider's create/add flows.
pub trait ClusterProviderV1: Send + Sync {
    /// Register a cluster type. Registering the same id twice replaces the
    /// earlier registration.
    fn register(&self, provider: Arc<dyn ClusterTypeProvider>);
}

/// Actions a cluster type can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterAction {
    Create,
    Configure,
}

pub trait ClusterTypeProvider: Send + Sync {
    fn cluster_type_id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn supported_actions(&self) -> Vec<ClusterAction>;
}
