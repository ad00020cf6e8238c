//! 能力接口层：按版本冻结的能力接口形状。
//!
//! # Capability Interfaces
//!
//! Each published `(component, version)` pair has exactly one interface
//! shape. Shapes live under a module per version and are never edited once
//! released; a changed shape is a new version module.
//!
//! The broker hands capabilities out as shared trait-object handles
//! (`Arc<dyn ...>`). Cloning a handle never copies the provider's object.

pub mod v1;
