//! Compute management client and data models.
//!
//! Provides typed structures and an asynchronous client for creating, listing and
//! scripting virtual machines.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ComputeClient, ComputeClientBuilder};
pub use models::{
    HardwareProfile, ImageReference, InstanceViewStatus, ManagedDisk, NetworkInterfaceReference,
    NetworkProfile, OsDisk, OsProfile, RunCommandInput, RunCommandResult, StorageProfile,
    VirtualMachine, VirtualMachineProperties, WindowsConfiguration,
};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
