//! Wire format of the request bodies sent while provisioning.

use serde_json::{json, Value};
use stratus_deployer::deployment::{AdminCredentials, Tier};
use stratus_deployer::naming::DeploymentNames;
use stratus_deployer::params;

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| panic!("Failed to serialize payload: {e}"))
}

fn admin() -> AdminCredentials {
    AdminCredentials::new("deployops", "Sup3rSecret!!").unwrap()
}

#[test]
fn test_virtual_network_payload() {
    let body = to_json(&params::virtual_network("southafricanorth"));
    assert_eq!(
        body,
        json!({
            "location": "southafricanorth",
            "properties": {"addressSpace": {"addressPrefixes": ["10.0.0.0/16"]}}
        })
    );
}

#[test]
fn test_tier_two_security_group_only_opens_rdp() {
    let body = to_json(&params::network_security_group("southafricanorth", Tier::Two));
    let rules = body["properties"]["securityRules"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["name"], "RDP-access-rule");
    assert_eq!(rules[0]["properties"]["destinationPortRange"], "3389");
    assert_eq!(rules[0]["properties"]["priority"], 110);
    assert_eq!(rules[0]["properties"]["protocol"], "Tcp");
    assert_eq!(rules[0]["properties"]["access"], "Allow");
    assert_eq!(rules[0]["properties"]["direction"], "Inbound");
}

#[test]
fn test_tier_three_security_group_opens_http() {
    let body = to_json(&params::network_security_group("southafricanorth", Tier::Three));
    let rules = body["properties"]["securityRules"].as_array().unwrap();
    let http = rules
        .iter()
        .find(|rule| rule["name"] == "lb-HTTP-rule")
        .expect("HTTP rule present");
    assert_eq!(http["properties"]["destinationPortRange"], "80");
    assert_eq!(http["properties"]["priority"], 100);
}

#[test]
fn test_subnet_references_security_group() {
    let body = to_json(&params::subnet("/subscriptions/s/nsg"));
    assert_eq!(
        body["properties"],
        json!({
            "addressPrefix": "10.0.0.0/24",
            "networkSecurityGroup": {"id": "/subscriptions/s/nsg"}
        })
    );
}

#[test]
fn test_public_ip_is_static_standard() {
    let body = to_json(&params::public_ip("southafricanorth"));
    assert_eq!(body["sku"]["name"], "Standard");
    assert_eq!(body["properties"]["publicIPAllocationMethod"], "Static");
}

#[test]
fn test_interface_without_public_ip() {
    let body = to_json(&params::network_interface(
        "southafricanorth",
        "dbserver",
        "subnet-id",
        None,
        None,
    ));
    let config = &body["properties"]["ipConfigurations"][0];
    assert_eq!(config["name"], "dbserver_ipconfig");
    assert_eq!(config["properties"], json!({"subnet": {"id": "subnet-id"}}));
}

#[test]
fn test_interface_in_backend_pool() {
    let body = to_json(&params::network_interface(
        "southafricanorth",
        "webserver1",
        "subnet-id",
        Some("ip-id"),
        Some("pool-id"),
    ));
    let properties = &body["properties"]["ipConfigurations"][0]["properties"];
    assert_eq!(properties["publicIPAddress"]["id"], "ip-id");
    assert_eq!(
        properties["loadBalancerBackendAddressPools"],
        json!([{"id": "pool-id"}])
    );
}

#[test]
fn test_webserver_vm_payload() {
    let body = to_json(&params::webserver_vm(
        "southafricanorth",
        "webserver0",
        "nic-id",
        &admin(),
    ));
    let properties = &body["properties"];
    assert_eq!(properties["hardwareProfile"]["vmSize"], "Standard_B1s");
    assert_eq!(
        properties["storageProfile"]["imageReference"],
        json!({
            "publisher": "MicrosoftWindowsServer",
            "offer": "WindowsServer",
            "sku": "2019-Datacenter",
            "version": "latest"
        })
    );
    assert_eq!(properties["osProfile"]["computerName"], "webserver0");
    assert_eq!(properties["osProfile"]["adminUsername"], "deployops");
    assert_eq!(properties["osProfile"]["adminPassword"], "Sup3rSecret!!");
    assert_eq!(
        properties["networkProfile"]["networkInterfaces"],
        json!([{"id": "nic-id"}])
    );
}

#[test]
fn test_dbserver_vm_uses_sql_image() {
    let body = to_json(&params::dbserver_vm(
        "southafricanorth",
        "dbserver",
        "nic-id",
        &admin(),
    ));
    let image = &body["properties"]["storageProfile"]["imageReference"];
    assert_eq!(image["publisher"], "MicrosoftSQLServer");
    assert_eq!(image["offer"], "sql2019-ws2019");
    assert_eq!(image["sku"], "sqldev-gen2");
}

#[test]
fn test_iis_setup_script() {
    let body = to_json(&params::iis_setup_command());
    assert_eq!(body["commandId"], "RunPowerShellScript");
    let script = body["script"].as_array().unwrap();
    assert_eq!(script.len(), 3);
    assert!(script[0]
        .as_str()
        .unwrap()
        .starts_with("Install-WindowsFeature -name Web-Server"));
}

#[test]
fn test_load_balancer_wires_children_together() {
    let names = DeploymentNames::new("shop");
    let body = to_json(&params::load_balancer(
        "southafricanorth",
        "sub-1",
        &names,
        "lb-ip-id",
    ));
    let lb = "/subscriptions/sub-1/resourceGroups/shop/providers/Microsoft.Network/loadBalancers/shop_lb";
    let properties = &body["properties"];

    assert_eq!(body["sku"]["name"], "Standard");
    assert_eq!(
        properties["frontendIPConfigurations"][0]["name"],
        "shop_lb_fip"
    );
    assert_eq!(
        properties["frontendIPConfigurations"][0]["properties"]["publicIPAddress"]["id"],
        "lb-ip-id"
    );
    assert_eq!(properties["backendAddressPools"][0]["name"], "shop_lb_addr_pool");
    assert_eq!(
        properties["probes"][0],
        json!({
            "name": "lb_healthprobe",
            "properties": {
                "protocol": "Tcp",
                "port": 80,
                "intervalInSeconds": 5,
                "numberOfProbes": 2
            }
        })
    );

    let rule = &properties["loadBalancingRules"][0];
    assert_eq!(rule["name"], "shop_lb_rule");
    assert_eq!(rule["properties"]["frontendPort"], 80);
    assert_eq!(rule["properties"]["backendPort"], 80);
    assert_eq!(rule["properties"]["enableFloatingIP"], false);
    assert_eq!(
        rule["properties"]["frontendIPConfiguration"]["id"],
        format!("{lb}/frontendIPConfigurations/shop_lb_fip")
    );
    assert_eq!(
        rule["properties"]["backendAddressPool"]["id"],
        format!("{lb}/backendAddressPools/shop_lb_addr_pool")
    );
    assert_eq!(
        rule["properties"]["probe"]["id"],
        format!("{lb}/probes/lb_healthprobe")
    );
}
