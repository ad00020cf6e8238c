//! In-process activator.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::{Activation, HostActivator, HostFault, RawBroker};

/// A [`HostActivator`] for providers living in the same process.
///
/// Providers can be installed after the activator is handed to a client,
/// which models a delayed install. Every `activate` call is counted.
pub struct InProcessActivator {
    providers: RwLock<HashMap<String, Activation>>,
    calls: AtomicUsize,
}

impl InProcessActivator {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Activator with one provider already installed.
    pub fn with_provider(provider_id: impl Into<String>, broker: Arc<dyn RawBroker>) -> Self {
        let activator = Self::new();
        activator.install(provider_id, broker);
        activator
    }

    pub fn install(&self, provider_id: impl Into<String>, broker: Arc<dyn RawBroker>) {
        self.set(provider_id.into(), Activation::Activated(broker));
    }

    /// Mark a provider as installed but failing to activate.
    pub fn fail(&self, provider_id: impl Into<String>, reason: impl Into<String>) {
        self.set(
            provider_id.into(),
            Activation::Failed {
                reason: reason.into(),
            },
        );
    }

    pub fn uninstall(&self, provider_id: &str) {
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers.remove(provider_id);
    }

    /// Number of `activate` calls made so far.
    pub fn activation_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set(&self, provider_id: String, activation: Activation) {
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers.insert(provider_id, activation);
    }
}

impl Default for InProcessActivator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostActivator for InProcessActivator {
    async fn activate(&self, provider_id: &str) -> Result<Activation, HostFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Activation is asynchronous in every real host; never complete inline.
        tokio::task::yield_now().await;
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        Ok(providers
            .get(provider_id)
            .cloned()
            .unwrap_or(Activation::NotInstalled))
    }
}
