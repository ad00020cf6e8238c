//! Minimal prelude for application code.
//!
//! Goal: reduce import noise without hiding important concepts.

pub use crate::capabilities::v1::{
    ClusterProviderV1Api, CommandTargetV1Api, ExplorerTreeV1Api, KubectlV1Api,
};
pub use crate::client::{BrokerClient, BrokerClientBuilder};
pub use crate::facade::ExtensionApi;
pub use crate::host::{Activation, HostActivator, HostFault, RawApi, RawBroker};
pub use crate::protocol::{ApiResult, CapabilityDescriptor, UnavailabilityReason};
