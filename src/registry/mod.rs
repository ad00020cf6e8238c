//! 能力注册表：将能力接口类型映射到线上描述符
//!
//! Capability registry: the single table tying each capability interface
//! type to its `(component, version)` wire descriptor.
//!
//! Supporting a new capability or version means adding exactly one entry to
//! [`known_entries`]. Interface types with no entry resolve to
//! [`CapabilityDescriptor::invalid`] instead of failing here; the broker
//! client turns that into an `Unavailable` result.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::capabilities::v1::{
    ClusterProviderV1Api, CommandTargetV1Api, ExplorerTreeV1Api, KubectlV1Api,
};
use crate::protocol::{ids, CapabilityDescriptor, ComponentId, VersionId};

/// Tag for every capability interface known to this client release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    ClusterProviderV1,
    KubectlV1,
    CommandTargetV1,
    ExplorerTreeV1,
}

impl CapabilityKind {
    /// All capability variants for iteration.
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::ClusterProviderV1,
        CapabilityKind::KubectlV1,
        CapabilityKind::CommandTargetV1,
        CapabilityKind::ExplorerTreeV1,
    ];

    /// Descriptor for this kind from the global registry.
    pub fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityRegistry::global().descriptor_of(*self)
    }

    /// The kind whose interface type is `T`, if any.
    pub fn of<T: ?Sized + 'static>() -> Option<CapabilityKind> {
        CapabilityRegistry::global().kind_of::<T>()
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::ClusterProviderV1 => write!(f, "cluster_provider_v1"),
            CapabilityKind::KubectlV1 => write!(f, "kubectl_v1"),
            CapabilityKind::CommandTargetV1 => write!(f, "command_target_v1"),
            CapabilityKind::ExplorerTreeV1 => write!(f, "explorer_tree_v1"),
        }
    }
}

/// One row of the registry.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub kind: CapabilityKind,
    pub descriptor: CapabilityDescriptor,
    interface: TypeId,
    interface_name: &'static str,
}

impl RegistryEntry {
    pub fn new<T: ?Sized + 'static>(
        kind: CapabilityKind,
        component: &'static str,
        version: &'static str,
    ) -> Self {
        Self {
            kind,
            descriptor: CapabilityDescriptor::from_static(component, version),
            interface: TypeId::of::<T>(),
            interface_name: std::any::type_name::<T>(),
        }
    }

    pub fn interface_name(&self) -> &'static str {
        self.interface_name
    }

    fn is_interface<T: ?Sized + 'static>(&self) -> bool {
        self.interface == TypeId::of::<T>()
    }
}

/// The authoritative table. Versions of a component are listed oldest first.
pub fn known_entries() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry::new::<ClusterProviderV1Api>(
            CapabilityKind::ClusterProviderV1,
            ids::CLUSTER_PROVIDER,
            ids::V1,
        ),
        RegistryEntry::new::<KubectlV1Api>(CapabilityKind::KubectlV1, ids::KUBECTL, ids::V1),
        RegistryEntry::new::<CommandTargetV1Api>(
            CapabilityKind::CommandTargetV1,
            ids::COMMAND_TARGET,
            ids::V1,
        ),
        RegistryEntry::new::<ExplorerTreeV1Api>(
            CapabilityKind::ExplorerTreeV1,
            ids::EXPLORER_TREE,
            ids::V1,
        ),
    ]
}

static GLOBAL_REGISTRY: Lazy<CapabilityRegistry> =
    Lazy::new(|| CapabilityRegistry::from_entries(known_entries()));

/// Immutable lookup table from interface type / kind to descriptor.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    entries: Vec<RegistryEntry>,
}

impl CapabilityRegistry {
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    /// The registry built from [`known_entries`].
    pub fn global() -> &'static CapabilityRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn kind_of<T: ?Sized + 'static>(&self) -> Option<CapabilityKind> {
        self.entries
            .iter()
            .find(|e| e.is_interface::<T>())
            .map(|e| e.kind)
    }

    /// Descriptor for interface type `T`, or the sentinel if `T` is unknown.
    pub fn descriptor_for<T: ?Sized + 'static>(&self) -> CapabilityDescriptor {
        self.entries
            .iter()
            .find(|e| e.is_interface::<T>())
            .map(|e| e.descriptor.clone())
            .unwrap_or_else(CapabilityDescriptor::invalid)
    }

    pub fn descriptor_of(&self, kind: CapabilityKind) -> CapabilityDescriptor {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.descriptor.clone())
            .unwrap_or_else(CapabilityDescriptor::invalid)
    }

    pub fn kind_for_descriptor(&self, descriptor: &CapabilityDescriptor) -> Option<CapabilityKind> {
        self.entries
            .iter()
            .find(|e| &e.descriptor == descriptor)
            .map(|e| e.kind)
    }

    /// Newest version of `component` known to this release.
    pub fn latest_version(&self, component: &ComponentId) -> Option<VersionId> {
        self.entries
            .iter()
            .rev()
            .find(|e| &e.descriptor.component == component)
            .map(|e| e.descriptor.version.clone())
    }

    /// Check that every kind has exactly one entry and that no descriptor
    /// or interface type is shared between entries.
    pub fn validate(&self) -> Result<(), Vec<RegistryGap>> {
        let mut gaps = Vec::new();

        let mut by_kind: HashMap<CapabilityKind, usize> = HashMap::new();
        let mut by_descriptor: HashMap<&CapabilityDescriptor, Vec<CapabilityKind>> = HashMap::new();
        let mut by_interface: HashMap<TypeId, (&'static str, Vec<CapabilityKind>)> = HashMap::new();

        for entry in &self.entries {
            *by_kind.entry(entry.kind).or_default() += 1;
            by_descriptor.entry(&entry.descriptor).or_default().push(entry.kind);
            by_interface
                .entry(entry.interface)
                .or_insert_with(|| (entry.interface_name, Vec::new()))
                .1
                .push(entry.kind);
            if entry.descriptor.is_invalid() {
                gaps.push(RegistryGap::SentinelDescriptor(entry.kind));
            }
        }

        for kind in CapabilityKind::ALL {
            match by_kind.get(&kind).copied().unwrap_or(0) {
                0 => gaps.push(RegistryGap::MissingKind(kind)),
                1 => {}
                _ => gaps.push(RegistryGap::DuplicateKind(kind)),
            }
        }

        for (descriptor, kinds) in by_descriptor {
            if kinds.len() > 1 {
                gaps.push(RegistryGap::DuplicateDescriptor {
                    descriptor: descriptor.clone(),
                    kinds,
                });
            }
        }

        for (_, (interface_name, kinds)) in by_interface {
            if kinds.len() > 1 {
                gaps.push(RegistryGap::DuplicateInterface {
                    interface_name,
                    kinds,
                });
            }
        }

        if gaps.is_empty() {
            Ok(())
        } else {
            Err(gaps)
        }
    }
}

/// A defect found by [`CapabilityRegistry::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryGap {
    MissingKind(CapabilityKind),
    DuplicateKind(CapabilityKind),
    DuplicateDescriptor {
        descriptor: CapabilityDescriptor,
        kinds: Vec<CapabilityKind>,
    },
    DuplicateInterface {
        interface_name: &'static str,
        kinds: Vec<CapabilityKind>,
    },
    SentinelDescriptor(CapabilityKind),
}

impl fmt::Display for RegistryGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryGap::MissingKind(kind) => write!(f, "capability {} has no registry entry", kind),
            RegistryGap::DuplicateKind(kind) => {
                write!(f, "capability {} has more than one registry entry", kind)
            }
            RegistryGap::DuplicateDescriptor { descriptor, kinds } => {
                write!(f, "descriptor {} is shared by {:?}", descriptor, kinds)
            }
            RegistryGap::DuplicateInterface {
                interface_name,
                kinds,
            } => write!(f, "interface {} is shared by {:?}", interface_name, kinds),
            RegistryGap::SentinelDescriptor(kind) => {
                write!(f, "capability {} uses the reserved sentinel descriptor", kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_registry_is_consistent() {
        assert_eq!(CapabilityRegistry::global().validate(), Ok(()));
    }

    #[test]
    fn test_every_kind_maps_to_expected_descriptor() {
        let expected = [
            (CapabilityKind::ClusterProviderV1, "clusterprovider", "v1"),
            (CapabilityKind::KubectlV1, "kubectl", "v1"),
            (CapabilityKind::CommandTargetV1, "commandtarget", "v1"),
            (CapabilityKind::ExplorerTreeV1, "explorertree", "v1"),
        ];
        assert_eq!(expected.len(), CapabilityKind::ALL.len());

        for (kind, component, version) in expected {
            let d = kind.descriptor();
            assert_eq!(d.component().as_str(), component, "component for {}", kind);
            assert_eq!(d.version().as_str(), version, "version for {}", kind);
        }
    }

    #[test]
    fn test_interface_types_resolve_to_their_kind() {
        let reg = CapabilityRegistry::global();
        assert_eq!(reg.kind_of::<ClusterProviderV1Api>(), Some(CapabilityKind::ClusterProviderV1));
        assert_eq!(reg.kind_of::<KubectlV1Api>(), Some(CapabilityKind::KubectlV1));
        assert_eq!(reg.kind_of::<CommandTargetV1Api>(), Some(CapabilityKind::CommandTargetV1));
        assert_eq!(reg.kind_of::<ExplorerTreeV1Api>(), Some(CapabilityKind::ExplorerTreeV1));

        assert_eq!(
            reg.descriptor_for::<KubectlV1Api>(),
            CapabilityDescriptor::from_static("kubectl", "v1")
        );
    }

    #[test]
    fn test_unknown_interface_resolves_to_sentinel() {
        let reg = CapabilityRegistry::global();
        assert_eq!(reg.kind_of::<String>(), None);
        assert!(reg.descriptor_for::<String>().is_invalid());
        // The bare trait object is not the handle type.
        assert!(reg
            .descriptor_for::<dyn crate::capabilities::v1::KubectlV1>()
            .is_invalid());
    }

    #[test]
    fn test_kind_for_descriptor_round_trips() {
        let reg = CapabilityRegistry::global();
        for kind in CapabilityKind::ALL {
            assert_eq!(reg.kind_for_descriptor(&kind.descriptor()), Some(kind));
        }
        assert_eq!(reg.kind_for_descriptor(&CapabilityDescriptor::invalid()), None);
    }

    #[test]
    fn test_latest_version_prefers_last_entry() {
        let reg = CapabilityRegistry::from_entries(vec![
            RegistryEntry::new::<KubectlV1Api>(CapabilityKind::KubectlV1, ids::KUBECTL, "v1"),
            RegistryEntry::new::<String>(CapabilityKind::KubectlV1, ids::KUBECTL, "v2"),
        ]);
        assert_eq!(
            reg.latest_version(&ComponentId::from_static(ids::KUBECTL)),
            Some(VersionId::from_static("v2"))
        );
        assert_eq!(reg.latest_version(&ComponentId::from_static("helm")), None);
    }

    #[test]
    fn test_validate_reports_missing_and_duplicates() {
        let reg = CapabilityRegistry::from_entries(vec![
            RegistryEntry::new::<KubectlV1Api>(CapabilityKind::KubectlV1, ids::KUBECTL, ids::V1),
            RegistryEntry::new::<KubectlV1Api>(
                CapabilityKind::ClusterProviderV1,
                ids::KUBECTL,
                ids::V1,
            ),
        ]);
        let gaps = reg.validate().unwrap_err();

        assert!(gaps.contains(&RegistryGap::MissingKind(CapabilityKind::CommandTargetV1)));
        assert!(gaps.contains(&RegistryGap::MissingKind(CapabilityKind::ExplorerTreeV1)));
        assert!(gaps
            .iter()
            .any(|g| matches!(g, RegistryGap::DuplicateDescriptor { kinds, .. } if kinds.len() == 2)));
        assert!(gaps
            .iter()
            .any(|g| matches!(g, RegistryGap::DuplicateInterface { kinds, .. } if kinds.len() == 2)));
    }

    #[test]
    fn test_validate_rejects_sentinel_entries() {
        let mut entries = known_entries();
        entries[1] = RegistryEntry::new::<KubectlV1Api>(
            CapabilityKind::KubectlV1,
            ids::INVALID_API_INTERFACE,
            ids::V1,
        );
        let gaps = CapabilityRegistry::from_entries(entries).validate().unwrap_err();
        assert_eq!(gaps, vec![RegistryGap::SentinelDescriptor(CapabilityKind::KubectlV1)]);
    }

    #[test]
    fn test_gap_display() {
        let gap = RegistryGap::MissingKind(CapabilityKind::KubectlV1);
        assert_eq!(gap.to_string(), "capability kubectl_v1 has no registry entry");
    }
}
