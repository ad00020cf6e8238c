//! Shared fixtures: fake capabilities, brokers and activators.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use capability_broker::capabilities::v1::{
    ClusterProviderV1, ClusterTypeProvider, CommandTarget, CommandTargetV1, ExplorerTreeV1,
    KubectlV1, NodeContributor, ResolvedTarget, ShellResult,
};
use capability_broker::host::RawApi;
use capability_broker::{
    Activation, ApiResult, BrokerClient, BrokerConfig, ComponentId, ExtensionApi, HostActivator,
    HostFault, RawBroker, UnavailabilityReason, VersionId,
};

pub const PROVIDER_ID: &str = "test.provider";

pub struct EchoKubectl;

#[async_trait]
impl KubectlV1 for EchoKubectl {
    async fn invoke_command(&self, command: &str) -> Option<ShellResult> {
        Some(ShellResult {
            code: 0,
            stdout: command.to_string(),
            stderr: String::new(),
        })
    }
}

#[derive(Default)]
pub struct RecordingClusterProvider {
    pub registered: Mutex<Vec<String>>,
}

impl ClusterProviderV1 for RecordingClusterProvider {
    fn register(&self, provider: Arc<dyn ClusterTypeProvider>) {
        self.registered
            .lock()
            .unwrap()
            .push(provider.cluster_type_id().to_string());
    }
}

pub struct ContextOnlyTargets;

impl CommandTargetV1 for ContextOnlyTargets {
    fn resolve_command_target(&self, target: &CommandTarget) -> Option<ResolvedTarget> {
        let name = target.0.get("context")?.as_str()?;
        Some(ResolvedTarget::Context {
            name: name.to_string(),
        })
    }
}

#[derive(Default)]
pub struct CountingExplorer {
    pub refreshes: AtomicUsize,
}

impl ExplorerTreeV1 for CountingExplorer {
    fn register_node_contributor(&self, _contributor: Arc<dyn NodeContributor>) {}

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Raw broker that records every request and answers `version-unknown`.
#[derive(Default)]
pub struct RecordingBroker {
    pub requests: Mutex<Vec<(String, String)>>,
}

impl RecordingBroker {
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl RawBroker for RecordingBroker {
    fn get(&self, component: &ComponentId, version: &VersionId) -> ApiResult<RawApi> {
        self.requests
            .lock()
            .unwrap()
            .push((component.to_string(), version.to_string()));
        ApiResult::unavailable(UnavailabilityReason::VersionUnknown)
    }
}

/// Activator that blocks every activation until `open` is called.
pub struct GatedActivator {
    calls: AtomicUsize,
    gate: Semaphore,
    outcome: Result<Activation, HostFault>,
}

impl GatedActivator {
    pub fn new(outcome: Result<Activation, HostFault>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            outcome,
        }
    }

    pub fn open(&self) {
        self.gate.add_permits(1024);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostActivator for GatedActivator {
    async fn activate(&self, _provider_id: &str) -> Result<Activation, HostFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await;
        self.outcome.clone()
    }
}

#[derive(Debug)]
pub struct HostCrashed;

impl std::fmt::Display for HostCrashed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("extension host crashed")
    }
}

impl std::error::Error for HostCrashed {}

pub fn api_with(activator: Arc<dyn HostActivator>) -> ExtensionApi {
    let client = BrokerClient::builder()
        .config(BrokerConfig::new().with_provider_id(PROVIDER_ID))
        .activator(activator)
        .build()
        .expect("client should build");
    ExtensionApi::new(client)
}

/// Let spawned tasks run until they are all parked on the activation.
///
/// Tests run on the current-thread runtime, so each yield lets every ready
/// task make progress once before this one resumes.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
