//! Broker client.
//!
//! Owns lazy acquisition of the provider's raw broker and exposes the
//! untyped (`get_core`) and typed (`get`) request operations.
//! Implementation details are split into submodules under `src/client/`.

pub mod acquisition;
pub mod builder;
pub mod core;

pub use acquisition::{AcquisitionSnapshot, AcquisitionState};
pub use builder::BrokerClientBuilder;
pub use core::BrokerClient;
