use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle type requested through the broker for `kubectl/v1`.
pub type KubectlV1Api = Arc<dyn KubectlV1>;

/// Output of a finished kubectl invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellResult {
    pub fn succeeded(&self) -> bool {
        self.code == 0
    }
}

/// Runs kubectl using the provider's configured binary and kubeconfig.
#[async_trait]
pub trait KubectlV1: Send + Sync {
    /// Run `kubectl <command>`. Returns `None` if kubectl could not be started.
    async fn invoke_command(&self, command: &str) -> Option<ShellResult>;
}
