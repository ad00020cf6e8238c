//! 协议标识层：定义组件、版本与能力描述符。
//!
//! # Protocol Identifiers
//!
//! Wire identifiers shared by the client and the provider. A capability is
//! addressed by a [`CapabilityDescriptor`], the pair of a [`ComponentId`]
//! (a capability domain) and a [`VersionId`] (a frozen revision of that
//! domain's interface shape).
//!
//! ## Rules
//!
//! - A component id is never reused for a different meaning.
//! - Once a version is published its shape is frozen. New shapes get new
//!   descriptors; old descriptors are never reinterpreted.
//! - [`CapabilityDescriptor::invalid`] is the reserved sentinel for interface
//!   types the registry does not know.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`result`] | Negotiation outcome (`ApiResult`) and unavailability reasons |

pub mod result;

pub use result::{ApiResult, UnavailabilityReason};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Well-known component identifiers.
pub mod ids {
    /// Cluster provisioning: providers register new cluster types.
    pub const CLUSTER_PROVIDER: &str = "clusterprovider";
    /// Kubectl execution against the active cluster.
    pub const KUBECTL: &str = "kubectl";
    /// Resolution of command targets from explorer selections.
    pub const COMMAND_TARGET: &str = "commandtarget";
    /// Contributions of nodes to the cluster explorer tree.
    pub const EXPLORER_TREE: &str = "explorertree";

    pub const V1: &str = "v1";

    /// Reserved for interface types with no registry entry.
    pub const INVALID_API_INTERFACE: &str = "invalid_api_interface";
}

/// Names a capability domain exposed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(Cow<'static, str>);

impl ComponentId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Names a protocol revision within a component (e.g. `"v1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(Cow<'static, str>);

impl VersionId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_conversions {
    ($ty:ty) => {
        impl From<&'static str> for $ty {
            fn from(id: &'static str) -> Self {
                Self::from_static(id)
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_id_conversions!(ComponentId);
impl_id_conversions!(VersionId);

/// The `(component, version)` pair identifying exactly one capability shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub component: ComponentId,
    pub version: VersionId,
}

impl CapabilityDescriptor {
    pub const fn from_static(component: &'static str, version: &'static str) -> Self {
        Self {
            component: ComponentId::from_static(component),
            version: VersionId::from_static(version),
        }
    }

    pub fn new(component: impl Into<ComponentId>, version: impl Into<VersionId>) -> Self {
        Self {
            component: component.into(),
            version: version.into(),
        }
    }

    /// The sentinel descriptor returned for unregistered interface types.
    pub const fn invalid() -> Self {
        Self::from_static(ids::INVALID_API_INTERFACE, ids::INVALID_API_INTERFACE)
    }

    pub fn is_invalid(&self) -> bool {
        self.component.as_str() == ids::INVALID_API_INTERFACE
            && self.version.as_str() == ids::INVALID_API_INTERFACE
    }

    pub fn component(&self) -> &ComponentId {
        &self.component
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        let d = CapabilityDescriptor::from_static(ids::KUBECTL, ids::V1);
        assert_eq!(d.to_string(), "kubectl/v1");
    }

    #[test]
    fn test_static_and_owned_ids_compare_equal() {
        let a = CapabilityDescriptor::from_static(ids::KUBECTL, ids::V1);
        let b = CapabilityDescriptor::new(String::from("kubectl"), String::from("v1"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sentinel() {
        let d = CapabilityDescriptor::invalid();
        assert!(d.is_invalid());
        assert_eq!(d.component().as_str(), "invalid_api_interface");
        assert_eq!(d.version().as_str(), "invalid_api_interface");
        assert!(!CapabilityDescriptor::from_static(ids::KUBECTL, ids::V1).is_invalid());
        assert!(!CapabilityDescriptor::from_static(ids::KUBECTL, ids::INVALID_API_INTERFACE)
            .is_invalid());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let d = CapabilityDescriptor::from_static(ids::CLUSTER_PROVIDER, ids::V1);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"component":"clusterprovider","version":"v1"}"#);

        let parsed: CapabilityDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }
}
