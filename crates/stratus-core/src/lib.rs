//! # stratus-core
//!
//! Core types and utilities shared by the Stratus management clients and tools.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`client`] - HTTP service client, retry policy and per-service timeouts
//! - [`config`] - Environment-driven cloud configuration
//! - [`credentials`] - Bearer token credentials
//! - [`ids`] - Management resource identifiers
//! - [`query`] - Query parameter builder
//! - [`types`] - Shared response envelopes and provisioning states
//! - [`validation`] - Resource name, username and password validation

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ids;
pub mod query;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{Error, Result};
