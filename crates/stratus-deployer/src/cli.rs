//! Command-line interface of the `deployer` binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use stratus_core::config::{CloudConfig, EnvFile};
use stratus_core::credentials::StaticTokenCredential;
use tracing::{error, info};

use crate::deployment::{AdminCredentials, DeploymentPlan, Tier, MAX_WEBSERVERS};
use crate::logging::{self, DEFAULT_LOG_FILE};
use crate::provisioner::Provisioner;

/// Environment variable holding the management API bearer token.
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "deployer", version, about = "Two- and three-tier web deployments")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// File receiving a copy of every log event.
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Deployer subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision a new deployment.
    Setup(SetupArgs),

    /// Show the tier and webserver addresses of a deployment.
    Info {
        /// Resource group name.
        name: String,
    },

    /// Delete a deployment and everything in it.
    Teardown {
        /// Resource group name.
        name: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments of `setup`.
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Resource group name; a random suffix is added if it is taken.
    pub name: String,

    /// Deployment topology.
    #[arg(long, value_enum, default_value_t = Tier::Two)]
    pub tier: Tier,

    /// Number of webservers behind the load balancer (tier 3 only).
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_WEBSERVERS))
    )]
    pub webservers: u8,

    /// VM administrator login; prompted for when absent.
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    /// VM administrator password; prompted for when absent.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl Cli {
    /// Execute the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, prompt or provisioning failure.
    pub async fn run(self, env_file: stratus_core::Result<EnvFile>) -> anyhow::Result<()> {
        logging::init(self.verbose, &self.log_file)?;
        env_file
            .inspect_err(|e| error!("Failed to load environment variables: {e}"))?
            .log();

        match self.command {
            Command::Setup(args) => {
                let admin = admin_credentials(args.admin_username, args.admin_password)?;
                let plan = DeploymentPlan::new(&args.name, args.tier, args.webservers, admin)?;
                let summary = provisioner()?.deploy(&plan).await?;
                info!("Deployment {} complete", summary.group);
                print!("{summary}");
            }
            Command::Info { name } => {
                let report = provisioner()?.info(&name).await?;
                print!("{report}");
            }
            Command::Teardown { name, yes } => {
                if !yes && !confirm_teardown(&name)? {
                    println!("Teardown cancelled.");
                    return Ok(());
                }
                provisioner()?.teardown(&name).await?;
            }
        }

        Ok(())
    }
}

fn provisioner() -> anyhow::Result<Provisioner> {
    let config = CloudConfig::from_env().context("invalid cloud configuration")?;
    let credential = StaticTokenCredential::from_env(ACCESS_TOKEN_VAR)?;
    Ok(Provisioner::from_config(&config, Arc::new(credential))?)
}

fn admin_credentials(
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<AdminCredentials> {
    let username = match username {
        Some(username) => username,
        None => Text::new("Admin username:").prompt()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new("Admin password:").prompt()?,
    };
    Ok(AdminCredentials::new(username, password)?)
}

fn confirm_teardown(group: &str) -> anyhow::Result<bool> {
    Ok(
        Confirm::new(&format!("Delete resource group {group} and everything in it?"))
            .with_default(false)
            .prompt()?,
    )
}
