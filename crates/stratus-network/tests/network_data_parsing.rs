//! Integration tests for parsing network management responses.
//!
//! These tests validate that the stratus-network models deserialize full service
//! responses, including fields the models do not carry.

use std::fs;
use std::path::PathBuf;
use stratus_core::ids::ResourceId;
use stratus_core::types::ProvisioningState;
use stratus_network::models::{LoadBalancer, NetworkInterface, TransportProtocol};

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_load_balancer() {
    let json_data = load_fixture("load_balancer.json");
    let lb: LoadBalancer = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize load balancer: {e}"));

    assert_eq!(lb.name.as_deref(), Some("shop_lb"));
    assert_eq!(lb.sku.as_ref().map(|s| s.name.as_str()), Some("Standard"));
    assert_eq!(
        lb.properties.provisioning_state,
        Some(ProvisioningState::Succeeded)
    );
    assert_eq!(lb.properties.frontend_ip_configurations.len(), 1);
    assert_eq!(lb.properties.backend_address_pools.len(), 1);
}

#[test]
fn test_load_balancer_probe_and_rule() {
    let lb: LoadBalancer = serde_json::from_str(&load_fixture("load_balancer.json")).unwrap();

    let probe = &lb.properties.probes[0];
    assert_eq!(probe.properties.protocol, Some(TransportProtocol::Tcp));
    assert_eq!(probe.properties.port, Some(80));
    assert_eq!(probe.properties.interval_in_seconds, Some(5));
    assert_eq!(probe.properties.number_of_probes, Some(2));

    let rule = &lb.properties.load_balancing_rules[0];
    assert_eq!(rule.properties.frontend_port, Some(80));
    assert_eq!(rule.properties.backend_port, Some(80));
    assert_eq!(rule.properties.idle_timeout_in_minutes, Some(4));
    assert_eq!(rule.properties.enable_floating_ip, Some(false));
    assert_eq!(rule.properties.load_distribution.as_deref(), Some("Default"));
}

#[test]
fn test_backend_pool_members_parse_as_ids() {
    let lb: LoadBalancer = serde_json::from_str(&load_fixture("load_balancer.json")).unwrap();
    let pool = &lb.properties.backend_address_pools[0];
    let pool_id: ResourceId = pool.id.as_deref().unwrap().parse().unwrap();
    assert_eq!(pool_id.name(), "shop_lb_addr_pool");
    assert_eq!(pool_id.parent_name(), "shop_lb");

    let members = &pool.properties.as_ref().unwrap().backend_ip_configurations;
    assert_eq!(members.len(), 2);
}

#[test]
fn test_deserialize_network_interface() {
    let nic: NetworkInterface =
        serde_json::from_str(&load_fixture("network_interface.json")).unwrap();

    let config = &nic.properties.ip_configurations[0];
    assert_eq!(config.properties.private_ip_address.as_deref(), Some("10.0.0.4"));
    let public_ip: ResourceId = config
        .properties
        .public_ip_address
        .as_ref()
        .and_then(|ip| ip.id.as_deref())
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(public_ip.name(), "webserver0_ip");
    assert_eq!(config.properties.load_balancer_backend_address_pools.len(), 1);
}
