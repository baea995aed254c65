//! Compute management models.

use serde::{Deserialize, Serialize};
use std::fmt;
use stratus_core::types::ProvisioningState;

/// A virtual machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VirtualMachine {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Machine properties.
    #[serde(default)]
    pub properties: VirtualMachineProperties,
}

/// Virtual machine properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    /// Size of the machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,
    /// Image and OS disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,
    /// Computer name and administrator account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<OsProfile>,
    /// Attached network interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
    /// Unique machine ID assigned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<String>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// Machine size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    /// Size name, e.g. `Standard_B1s`.
    pub vm_size: String,
}

/// Image and disk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    /// Marketplace image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
    /// Operating system disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<OsDisk>,
}

/// Marketplace image reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageReference {
    /// Image publisher.
    pub publisher: String,
    /// Image offer.
    pub offer: String,
    /// Image SKU.
    pub sku: String,
    /// Image version (`latest` for the newest).
    pub version: String,
}

impl ImageReference {
    /// Latest version of the given image.
    #[must_use]
    pub fn latest(publisher: &str, offer: &str, sku: &str) -> Self {
        Self {
            publisher: publisher.to_string(),
            offer: offer.to_string(),
            sku: sku.to_string(),
            version: "latest".to_string(),
        }
    }
}

/// Operating system disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    /// Host caching mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching: Option<String>,
    /// Managed disk settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_disk: Option<ManagedDisk>,
    /// How the disk is created, e.g. `FromImage`.
    pub create_option: String,
}

/// Managed disk settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDisk {
    /// Storage account type, e.g. `Standard_LRS`.
    pub storage_account_type: String,
}

/// Computer name and administrator account.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    /// Host name inside the guest.
    pub computer_name: String,
    /// Administrator login.
    pub admin_username: String,
    /// Administrator password; never returned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// Windows guest settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_configuration: Option<WindowsConfiguration>,
}

impl fmt::Debug for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsProfile")
            .field("computer_name", &self.computer_name)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("windows_configuration", &self.windows_configuration)
            .finish()
    }
}

/// Windows guest settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WindowsConfiguration {
    /// Install updates automatically.
    pub enable_automatic_updates: bool,
}

/// Attached network interfaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// Interface references.
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

/// Reference to a network interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkInterfaceReference {
    /// Interface resource ID.
    pub id: String,
}

/// Script execution request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunCommandInput {
    /// Command ID, e.g. `RunPowerShellScript`.
    pub command_id: String,
    /// Script lines.
    #[serde(default)]
    pub script: Vec<String>,
}

impl RunCommandInput {
    /// PowerShell script made of `lines`.
    #[must_use]
    pub fn powershell<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command_id: "RunPowerShellScript".to_string(),
            script: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Output of a finished script execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunCommandResult {
    /// Status entries (stdout and stderr).
    #[serde(default)]
    pub value: Vec<InstanceViewStatus>,
}

/// Status entry of an instance view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    /// Status code, e.g. `ComponentStatus/StdOut/succeeded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// `Info`, `Warning` or `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Short status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_status: Option<String>,
    /// Detailed message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
