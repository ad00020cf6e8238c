//! Version 1 capability shapes.

mod cluster_provider;
mod command_target;
mod explorer_tree;
mod kubectl;

pub use cluster_provider::{ClusterAction, ClusterProviderV1, ClusterProviderV1Api, ClusterTypeProvider};
pub use command_target::{CommandTarget, CommandTargetV1, CommandTargetV1Api, ResolvedTarget};
pub use explorer_tree::{ExplorerNode, ExplorerTreeV1, ExplorerTreeV1Api, NodeContributor};
pub use kubectl::{KubectlV1, KubectlV1Api, ShellResult};
