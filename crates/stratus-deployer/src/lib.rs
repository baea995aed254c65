//! Provision two- and three-tier web deployments.
//!
//! A deployment is one resource group holding a virtual network, a security group, a
//! subnet, Windows webservers running IIS and a SQL Server database VM. Tier 3 adds a
//! load balancer in front of the webservers.

#![deny(missing_docs)]

pub mod cli;
pub mod deployment;
pub mod logging;
pub mod naming;
pub mod params;
pub mod ports;
pub mod provisioner;
pub mod report;

pub use deployment::{AdminCredentials, DeploymentPlan, Tier};
pub use provisioner::Provisioner;
pub use report::{DeploymentSummary, InfraReport, ServerAddress};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
