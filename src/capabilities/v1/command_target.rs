use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle type requested through the broker for `commandtarget/v1`.
pub type CommandTargetV1Api = Arc<dyn CommandTargetV1>;

/// Opaque command argument as received from the host UI.
///
/// Its layout is owned by the provider, so it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTarget(pub serde_json::Value);

/// What a command target refers to, once the provider has interpreted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolvedTarget {
    Context {
        name: String,
    },
    Namespace {
        name: String,
    },
    Resource {
        resource_kind: String,
        name: String,
        #[serde(default)]
        namespace: Option<String>,
    },
    Folder {
        display_name: String,
    },
}

/// Turns command arguments into explorer targets.
pub trait CommandTargetV1: Send + Sync {
    /// `None` if the target did not originate from the provider's explorer.
    fn resolve_command_target(&self, target: &CommandTarget) -> Option<ResolvedTarget>;
}
