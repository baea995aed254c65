//! Resource group management client.
//!
//! Provides typed structures and an asynchronous client for checking, creating, reading
//! and deleting resource groups.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ResourcesClient, ResourcesClientBuilder};
pub use models::{ResourceGroup, ResourceGroupProperties};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
