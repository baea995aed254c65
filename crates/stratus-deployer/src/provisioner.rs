//! Provisioning orchestrator.
//!
//! Each step runs only once the previous one returned the object it depends on. Failures
//! are logged with context where they happen and propagated, so nothing after a failed
//! step is attempted.

use std::collections::HashSet;
use std::sync::Arc;

use stratus_compute::ComputeClientBuilder;
use stratus_core::config::CloudConfig;
use stratus_core::credentials::TokenCredential;
use stratus_core::ids::ResourceId;
use stratus_core::validation::validate_group_name;
use stratus_core::Error;
use stratus_network::NetworkClientBuilder;
use stratus_resources::ResourcesClientBuilder;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::deployment::{validate_derived_names, AdminCredentials, DeploymentPlan, Tier};
use crate::naming::{server_for_public_ip, DeploymentNames, DBSERVER_NAME};
use crate::params;
use crate::ports::{ComputeApi, NetworkApi, ResourceGroupApi};
use crate::report::{DeploymentSummary, InfraReport, ServerAddress};
use crate::Result;

/// Length of the random suffix appended to a taken group name.
const GROUP_SUFFIX_LEN: usize = 5;

/// Drives the management APIs to build, inspect and delete deployments.
pub struct Provisioner {
    resources: Arc<dyn ResourceGroupApi>,
    network: Arc<dyn NetworkApi>,
    compute: Arc<dyn ComputeApi>,
    subscription_id: String,
    location: String,
}

impl Provisioner {
    /// Create a provisioner over the given operations.
    pub fn new(
        resources: Arc<dyn ResourceGroupApi>,
        network: Arc<dyn NetworkApi>,
        compute: Arc<dyn ComputeApi>,
        subscription_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            resources,
            network,
            compute,
            subscription_id: subscription_id.into(),
            location: location.into(),
        }
    }

    /// Create a provisioner backed by the management REST clients.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a client cannot be built.
    pub fn from_config(config: &CloudConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let endpoint = config.management_endpoint.as_str();
        let subscription = config.subscription_id.as_str();

        let resources = ResourcesClientBuilder::new(endpoint, subscription)?
            .with_credential(Arc::clone(&credential))
            .build()?;
        let network = NetworkClientBuilder::new(endpoint, subscription)?
            .with_credential(Arc::clone(&credential))
            .build()?;
        let compute = ComputeClientBuilder::new(endpoint, subscription)?
            .with_credential(credential)
            .build()?;

        Ok(Self::new(
            Arc::new(resources),
            Arc::new(network),
            Arc::new(compute),
            subscription,
            config.location.as_str(),
        ))
    }

    /// Provision a complete deployment.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that failed.
    pub async fn deploy(&self, plan: &DeploymentPlan) -> Result<DeploymentSummary> {
        let group = self.ensure_resource_group(&plan.group, plan.tier).await?;
        let names = DeploymentNames::new(group.as_str());

        let subnet_id = self.create_infrastructure(&names, plan.tier).await?;

        let mut logins = Vec::with_capacity(usize::from(plan.webservers));
        for index in 0..plan.webservers {
            logins.push(
                self.create_webserver(&names, index, &subnet_id, &plan.admin)
                    .await?,
            );
        }

        self.create_dbserver(&names, &subnet_id, &plan.admin).await?;

        let mut load_balancer_ip = None;
        if plan.tier.has_load_balancer() {
            load_balancer_ip = self.create_load_balancer(&names).await?;
            self.attach_backend_pool(&names, plan.webservers, &subnet_id)
                .await?;
        }

        Ok(DeploymentSummary {
            group,
            tier: plan.tier,
            logins,
            load_balancer_ip,
        })
    }

    /// Create the resource group, picking a free name if the requested one is taken.
    ///
    /// Returns the name actually created. A suffixed name must still yield valid names
    /// for every resource of `tier`; nothing is created otherwise.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid name or the service error.
    pub async fn ensure_resource_group(&self, requested: &str, tier: Tier) -> Result<String> {
        let base = validate_group_name(requested)?;
        validate_derived_names(&base, tier)?;
        let mut candidate = base.clone();

        info!("Creating resource group");
        while self.resources.exists(&candidate).await? {
            warn!("The resource group {candidate} already exists.");
            candidate = validate_group_name(&format!("{base}-{}", group_suffix()))?;
            validate_derived_names(&candidate, tier).inspect_err(|e| {
                error!("Resource group {base} is taken and {candidate} cannot be used: {e}");
            })?;
        }

        self.resources
            .create(&candidate, &self.location)
            .await
            .inspect_err(|e| error!("Failed to create resource group {candidate}: {e}"))?;

        info!("Resource group {candidate} created successfully");
        Ok(candidate)
    }

    /// Create the virtual network, security group and subnet; returns the subnet ID.
    ///
    /// # Errors
    ///
    /// Aborts if a step fails or the security group comes back without an ID.
    pub async fn create_infrastructure(&self, names: &DeploymentNames, tier: Tier) -> Result<String> {
        let group = names.group();
        let vnet_name = names.vnet();
        let nsg_name = names.nsg();
        let subnet_name = names.subnet();

        info!("Creating VNet");
        self.network
            .create_virtual_network(group, &vnet_name, &params::virtual_network(&self.location))
            .await
            .inspect_err(|e| error!("Possible conflicting address space error: {e}"))?;
        info!("VNet created successfully");

        info!("Creating NSG group");
        let nsg = self
            .network
            .create_security_group(
                group,
                &nsg_name,
                &params::network_security_group(&self.location, tier),
            )
            .await
            .inspect_err(|e| error!("Failed to create NSG {nsg_name}: {e}"))?;
        let nsg_id = require_id(nsg.id, "Network security group", &nsg_name)?;
        info!("NSG created successfully.");

        info!("Creating subnet within VNet");
        let subnet = self
            .network
            .create_subnet(group, &vnet_name, &subnet_name, &params::subnet(&nsg_id))
            .await
            .inspect_err(|e| error!("Possible conflicting address space error: {e}"))?;
        info!("Subnet {subnet_name} created successfully.");

        Ok(subnet.id.unwrap_or_else(|| {
            ResourceId::subnet(&self.subscription_id, group, &vnet_name, &subnet_name).to_string()
        }))
    }

    /// Create webserver `index`: public IP, NIC, VM and IIS setup.
    ///
    /// # Errors
    ///
    /// Aborts at the first failed step or missing resource ID.
    pub async fn create_webserver(
        &self,
        names: &DeploymentNames,
        index: u8,
        subnet_id: &str,
        admin: &AdminCredentials,
    ) -> Result<ServerAddress> {
        let group = names.group();
        let server = DeploymentNames::webserver(index);
        let ip_name = DeploymentNames::public_ip(&server);
        let nic_name = DeploymentNames::interface(&server);

        let ip = self.create_public_ip(group, &ip_name).await?;
        let ip_id = require_id(ip.id.clone(), "Public IP", &ip_name)?;

        info!("Creating {server}'s NIC interface");
        let nic = self
            .network
            .create_network_interface(
                group,
                &nic_name,
                &params::network_interface(&self.location, &server, subnet_id, Some(&ip_id), None),
            )
            .await
            .inspect_err(|e| error!("Failed to create NIC {nic_name}: {e}"))?;
        let nic_id = require_id(nic.id, "NIC", &nic_name)?;
        info!("NIC {nic_name} created successfully.");

        info!("Creating {server} instance");
        let vm = self
            .compute
            .create_virtual_machine(
                group,
                &server,
                &params::webserver_vm(&self.location, &server, &nic_id, admin),
            )
            .await
            .inspect_err(|e| {
                error!("There may have been an error creating a webserver's dependent resource: {e}");
            })?;
        info!(
            "{server} deployment status: {:?}",
            vm.properties.provisioning_state
        );

        info!("Setting up IIS on {server}");
        self.compute
            .run_command(group, &server, &params::iis_setup_command())
            .await
            .inspect_err(|e| error!("Failed to set up IIS on {server}: {e}"))?;

        let ip_address = match ip.ip_address() {
            Some(address) => Some(address.to_string()),
            None => self.lookup_ip_address(group, &ip_name).await,
        };

        Ok(ServerAddress {
            server,
            ip_address,
        })
    }

    /// Create the database server: NIC without public IP, then the VM.
    ///
    /// # Errors
    ///
    /// Aborts at the first failed step or missing resource ID.
    pub async fn create_dbserver(
        &self,
        names: &DeploymentNames,
        subnet_id: &str,
        admin: &AdminCredentials,
    ) -> Result<()> {
        let group = names.group();
        let nic_name = DeploymentNames::interface(DBSERVER_NAME);

        info!("Creating {DBSERVER_NAME}'s NIC interface");
        let nic = self
            .network
            .create_network_interface(
                group,
                &nic_name,
                &params::network_interface(&self.location, DBSERVER_NAME, subnet_id, None, None),
            )
            .await
            .inspect_err(|e| error!("Failed to create NIC {nic_name}: {e}"))?;
        let nic_id = require_id(nic.id, "NIC", &nic_name)?;
        info!("NIC {nic_name} created successfully.");

        info!("Creating the Database server instance");
        let vm = self
            .compute
            .create_virtual_machine(
                group,
                DBSERVER_NAME,
                &params::dbserver_vm(&self.location, DBSERVER_NAME, &nic_id, admin),
            )
            .await
            .inspect_err(|e| {
                error!("There may have been an error creating the dbserver's resource: {e}");
            })?;
        info!(
            "Database server deployment status: {:?}",
            vm.properties.provisioning_state
        );
        Ok(())
    }

    /// Create the load balancer and its public IP; returns the public address if known.
    ///
    /// # Errors
    ///
    /// Aborts if the public IP comes back without an ID or a step fails.
    pub async fn create_load_balancer(&self, names: &DeploymentNames) -> Result<Option<String>> {
        let group = names.group();
        let lb_name = names.load_balancer();
        let ip_name = names.load_balancer_ip();

        let ip = self.create_public_ip(group, &ip_name).await?;
        let ip_id = require_id(ip.id.clone(), "Public IP", &ip_name)?;

        info!("Creating {lb_name} instance");
        let balancer = self
            .network
            .create_load_balancer(
                group,
                &lb_name,
                &params::load_balancer(&self.location, &self.subscription_id, names, &ip_id),
            )
            .await
            .inspect_err(|e| {
                error!("There may have been an error creating the LB dependent resource: {e}");
            })?;
        info!(
            "{lb_name} deployment status: {:?}",
            balancer.properties.provisioning_state
        );

        Ok(ip.properties.ip_address)
    }

    /// Put webservers `0..count` into the load balancer backend pool.
    ///
    /// # Errors
    ///
    /// Aborts if the pool cannot be read, has no ID, or a NIC update fails.
    pub async fn attach_backend_pool(
        &self,
        names: &DeploymentNames,
        count: u8,
        subnet_id: &str,
    ) -> Result<()> {
        let group = names.group();
        let lb_name = names.load_balancer();
        let pool_name = names.backend_pool();

        let pool = self
            .network
            .get_backend_pool(group, &lb_name, &pool_name)
            .await
            .inspect_err(|e| error!("A referenced resource was not found: {e}"))?;
        let pool_id = require_id(pool.id, "Backend pool", &pool_name)?;

        for index in 0..count {
            let server = DeploymentNames::webserver(index);
            let nic_name = DeploymentNames::interface(&server);
            let ip_id = ResourceId::public_ip_address(
                &self.subscription_id,
                group,
                &DeploymentNames::public_ip(&server),
            )
            .to_string();

            info!("Adding {server} to backend pool");
            self.network
                .create_network_interface(
                    group,
                    &nic_name,
                    &params::network_interface(
                        &self.location,
                        &server,
                        subnet_id,
                        Some(&ip_id),
                        Some(&pool_id),
                    ),
                )
                .await
                .inspect_err(|e| error!("Error adding {server} to backend: {e}"))?;
            info!("Added {server} to backend pool");
        }
        Ok(())
    }

    /// Describe an existing deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist.
    pub async fn info(&self, group: &str) -> Result<InfraReport> {
        let balancers = self
            .network
            .list_load_balancers(group)
            .await
            .inspect_err(|e| log_group_error(group, e))?;
        let tier = if balancers.is_empty() {
            Tier::Two
        } else {
            Tier::Three
        };

        let machines = self
            .compute
            .list_virtual_machines(group)
            .await
            .inspect_err(|e| log_group_error(group, e))?;
        let machine_names: HashSet<String> =
            machines.into_iter().filter_map(|vm| vm.name).collect();

        let addresses = self
            .network
            .list_public_ips(group)
            .await
            .inspect_err(|e| log_group_error(group, e))?;

        // Only addresses owned by a VM; this leaves out the load balancer's.
        let servers = addresses
            .into_iter()
            .filter_map(|ip| {
                let owner = server_for_public_ip(ip.name.as_deref()?)?.to_string();
                machine_names.contains(&owner).then(|| ServerAddress {
                    server: owner,
                    ip_address: ip.properties.ip_address,
                })
            })
            .collect();

        Ok(InfraReport { tier, servers })
    }

    /// Delete a deployment's resource group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist.
    pub async fn teardown(&self, group: &str) -> Result<()> {
        info!("Deleting {group}...");
        self.resources
            .delete(group)
            .await
            .inspect_err(|e| log_group_error(group, e))?;
        info!("Deletion of {group} accepted.");
        Ok(())
    }

    async fn create_public_ip(
        &self,
        group: &str,
        name: &str,
    ) -> Result<stratus_network::PublicIpAddress> {
        let ip = self
            .network
            .create_public_ip(group, name, &params::public_ip(&self.location))
            .await
            .inspect_err(|e| error!("Public IP count limit may have been reached: {e}"))?;
        info!("{name} created successfully.");
        Ok(ip)
    }

    async fn lookup_ip_address(&self, group: &str, name: &str) -> Option<String> {
        match self.network.get_public_ip(group, name).await {
            Ok(ip) => ip.properties.ip_address,
            Err(e) => {
                warn!("Could not read the address of {name}: {e}");
                None
            }
        }
    }
}

fn group_suffix() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GROUP_SUFFIX_LEN)
        .collect()
}

fn require_id(id: Option<String>, kind: &str, name: &str) -> Result<String> {
    id.filter(|id| !id.is_empty()).ok_or_else(|| {
        error!("{kind} {name} was returned without an ID");
        Error::IncompleteResponse(format!("{kind} {name} was returned without an ID"))
    })
}

fn log_group_error(group: &str, err: &Error) {
    if matches!(err, Error::NotFound(_)) {
        error!("Resource Group {group} not found.");
    } else {
        error!("Failed to read resource group {group}: {err}");
    }
}
