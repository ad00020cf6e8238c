use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle type requested through the broker for `explorertree/v1`.
pub type ExplorerTreeV1Api = Arc<dyn ExplorerTreeV1>;

/// A node shown in the cluster explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub context_value: Option<String>,
    #[serde(default)]
    pub children: Vec<ExplorerNode>,
}

/// Adds child nodes under existing explorer nodes.
pub trait NodeContributor: Send + Sync {
    /// Whether this contributor adds children under nodes of the given kind.
    fn contributes_to(&self, parent_kind: &str) -> bool;
    fn children(&self, parent: &ExplorerNode) -> Vec<ExplorerNode>;
}

pub trait ExplorerTreeV1: Send + Sync {
    fn register_node_contributor(&self, contributor: Arc<dyn NodeContributor>);
    /// Ask the provider to re-render the explorer.
    fn refresh(&self);
}
