//! # capability-broker
//!
//! 能力协商代理：让客户端模块在不预知提供方版本的情况下获取其能力。
//!
//! Capability negotiation broker. A client module asks a separately
//! installed, separately versioned provider module in the same process for a
//! capability by `(component, version)`, without either side knowing the
//! other's exact version in advance.
//!
//! ## Overview
//!
//! - **Descriptors**: every capability shape has one frozen
//!   [`CapabilityDescriptor`]; new shapes get new descriptors.
//! - **Negotiation results are data**: a request yields [`ApiResult`], either
//!   the capability or one of three [`UnavailabilityReason`]s. Only host
//!   infrastructure faults are errors.
//! - **Lazy, single-flight activation**: the provider is activated on the
//!   first request; concurrent requests share that one activation.
//! - **Typed access over an untyped boundary**: the [`registry`] maps each
//!   handle type to its descriptor, and objects are shape-checked before
//!   they are handed out as that type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use capability_broker::capabilities::v1::KubectlV1;
//! use capability_broker::{ApiResult, ExtensionApi, InProcessActivator};
//!
//! #[tokio::main]
//! async fn main() -> capability_broker::Result<()> {
//!     let api = ExtensionApi::with_activator(Arc::new(InProcessActivator::new()))?;
//!
//!     match api.kubectl().v1().await? {
//!         ApiResult::Available { api: kubectl } => {
//!             let _ = kubectl.invoke_command("get pods").await;
//!         }
//!         ApiResult::Unavailable { reason } => {
//!             println!("kubectl unavailable: {}", reason);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Descriptors, reason codes and the result model |
//! | [`capabilities`] | Frozen capability interface shapes per version |
//! | [`registry`] | Handle type to descriptor table |
//! | [`client`] | Broker client and provider acquisition |
//! | [`facade`] | Versioned accessors and the top-level `ExtensionApi` |
//! | [`host`] | Host activation and raw broker contracts |
//! | [`provider`] | Provider-side broker table |
//! | [`config`] | Client configuration |

pub mod capabilities;
pub mod client;
pub mod config;
pub mod facade;
pub mod host;
pub mod provider;
pub mod protocol;
pub mod registry;

pub use client::{AcquisitionSnapshot, AcquisitionState, BrokerClient, BrokerClientBuilder};
pub use config::BrokerConfig;
pub use facade::ExtensionApi;
pub use host::{Activation, HostActivator, HostFault, InProcessActivator, RawApi, RawBroker};
pub use protocol::{ApiResult, CapabilityDescriptor, ComponentId, UnavailabilityReason, VersionId};
pub use provider::ProviderBroker;
pub use registry::{CapabilityKind, CapabilityRegistry};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
