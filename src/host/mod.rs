//! 宿主契约层：宿主激活机制与提供方原始代理的接口。
//!
//! # Host Contracts
//!
//! The broker client sits between two collaborators it does not own:
//!
//! | Contract | Owner | Description |
//! |----------|-------|-------------|
//! | [`HostActivator`] | host | Activates the provider module, asynchronously, possibly failing |
//! | [`RawBroker`] | provider | Answers `(component, version)` requests synchronously once active |
//!
//! Values crossing the provider boundary are untyped ([`RawApi`]); the client
//! checks their shape before handing them out as a concrete capability type.

mod in_process;

pub use in_process::InProcessActivator;

use async_trait::async_trait;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::protocol::{ApiResult, ComponentId, VersionId};

/// An untyped capability object as returned by the provider.
pub type RawApi = Arc<dyn Any + Send + Sync>;

/// Erase a capability handle for transport through a [`RawBroker`].
///
/// `api` should be the handle type registered for the descriptor, e.g. a
/// [`crate::capabilities::v1::KubectlV1Api`].
pub fn into_raw_api<T: Send + Sync + 'static>(api: T) -> RawApi {
    Arc::new(api)
}

/// The provider's broker. Synchronous once the provider is active.
pub trait RawBroker: Send + Sync {
    fn get(&self, component: &ComponentId, version: &VersionId) -> ApiResult<RawApi>;
}

/// Outcome of asking the host to activate a provider.
#[derive(Clone)]
pub enum Activation {
    Activated(Arc<dyn RawBroker>),
    /// No provider with that id is installed.
    NotInstalled,
    /// The provider is installed but its activation failed.
    Failed { reason: String },
}

impl Activation {
    pub fn is_activated(&self) -> bool {
        matches!(self, Activation::Activated(_))
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Activated(_) => f.write_str("Activated(..)"),
            Activation::NotInstalled => f.write_str("NotInstalled"),
            Activation::Failed { reason } => {
                f.debug_struct("Failed").field("reason", reason).finish()
            }
        }
    }
}

/// The host's module-activation entrypoint.
///
/// Activation of an already active provider must return the same broker.
/// Anything returned as `Err` is treated as an infrastructure fault and is
/// propagated to callers unchanged.
#[async_trait]
pub trait HostActivator: Send + Sync {
    async fn activate(&self, provider_id: &str) -> Result<Activation, HostFault>;
}

/// A fault raised inside the host's activation machinery.
///
/// Cloneable so that one failed activation can be reported to every request
/// that was waiting on it.
#[derive(Clone)]
pub struct HostFault(Arc<dyn StdError + Send + Sync + 'static>);

impl HostFault {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(Arc::from(err))
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for HostFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for HostFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for HostFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Crashed;

    impl fmt::Display for Crashed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("activation host crashed")
        }
    }

    impl StdError for Crashed {}

    #[test]
    fn test_host_fault_keeps_original_error() {
        let fault = HostFault::new(Crashed);
        assert_eq!(fault.to_string(), "activation host crashed");
        assert!(fault.downcast_ref::<Crashed>().is_some());

        let cloned = fault.clone();
        assert!(cloned.downcast_ref::<Crashed>().is_some());
    }

    #[test]
    fn test_host_fault_from_boxed() {
        let boxed: Box<dyn StdError + Send + Sync> = "no such module".into();
        let fault = HostFault::from_boxed(boxed);
        assert_eq!(fault.to_string(), "no such module");
    }

    #[test]
    fn test_raw_api_downcasts_to_erased_type() {
        let api = into_raw_api(Arc::new(5_u32));
        let handle = api.downcast_ref::<Arc<u32>>().cloned().unwrap();
        assert_eq!(*handle, 5);
        assert!(api.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_activation_debug_hides_broker() {
        assert_eq!(format!("{:?}", Activation::NotInstalled), "NotInstalled");
        assert_eq!(
            format!("{:?}", Activation::Failed { reason: "boom".into() }),
            "Failed { reason: \"boom\" }"
        );
    }
}
