//! End-to-end provisioning against a mocked management endpoint.

use std::sync::Arc;

use serde_json::json;
use stratus_core::config::CloudConfig;
use stratus_core::credentials::StaticTokenCredential;
use stratus_core::Error;
use stratus_deployer::deployment::{AdminCredentials, DeploymentPlan, Tier};
use stratus_deployer::provisioner::Provisioner;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP: &str = "/subscriptions/sub-1/resourcegroups/shop";
const NETWORK: &str = "/subscriptions/sub-1/resourceGroups/shop/providers/Microsoft.Network";
const COMPUTE: &str = "/subscriptions/sub-1/resourceGroups/shop/providers/Microsoft.Compute";

fn provisioner(server: &MockServer) -> Provisioner {
    let config = CloudConfig::new("sub-1")
        .unwrap()
        .with_management_endpoint(server.uri());
    Provisioner::from_config(&config, Arc::new(StaticTokenCredential::new("test-token"))).unwrap()
}

async fn respond(server: &MockServer, verb: &str, route: String, status: u16, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route.as_str()))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_tier_two_deployment() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    respond(&server, "PUT", GROUP.to_string(), 201, json!({
        "name": "shop", "location": "southafricanorth"
    }))
    .await;
    respond(&server, "PUT", format!("{NETWORK}/virtualNetworks/shop_vnet"), 201, json!({
        "name": "shop_vnet"
    }))
    .await;
    respond(&server, "PUT", format!("{NETWORK}/networkSecurityGroups/shop_nsg"), 201, json!({
        "id": format!("{NETWORK}/networkSecurityGroups/shop_nsg")
    }))
    .await;
    respond(
        &server,
        "PUT",
        format!("{NETWORK}/virtualNetworks/shop_vnet/subnets/shop_subnet"),
        201,
        json!({"id": format!("{NETWORK}/virtualNetworks/shop_vnet/subnets/shop_subnet")}),
    )
    .await;
    respond(&server, "PUT", format!("{NETWORK}/publicIPAddresses/webserver0_ip"), 201, json!({
        "id": format!("{NETWORK}/publicIPAddresses/webserver0_ip"),
        "properties": {"ipAddress": "20.1.2.3"}
    }))
    .await;
    respond(
        &server,
        "PUT",
        format!("{NETWORK}/networkInterfaces/webserver0_interface"),
        201,
        json!({"id": format!("{NETWORK}/networkInterfaces/webserver0_interface")}),
    )
    .await;
    respond(
        &server,
        "PUT",
        format!("{NETWORK}/networkInterfaces/dbserver_interface"),
        201,
        json!({"id": format!("{NETWORK}/networkInterfaces/dbserver_interface")}),
    )
    .await;
    respond(&server, "PUT", format!("{COMPUTE}/virtualMachines/webserver0"), 201, json!({
        "name": "webserver0", "properties": {"provisioningState": "Creating"}
    }))
    .await;
    respond(&server, "PUT", format!("{COMPUTE}/virtualMachines/dbserver"), 201, json!({
        "name": "dbserver", "properties": {"provisioningState": "Creating"}
    }))
    .await;
    Mock::given(method("POST"))
        .and(path(format!("{COMPUTE}/virtualMachines/webserver0/runCommand").as_str()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let admin = AdminCredentials::new("deployops", "Sup3rSecret!!").unwrap();
    let plan = DeploymentPlan::new("shop", Tier::Two, 1, admin).unwrap();
    let summary = provisioner(&server).deploy(&plan).await.unwrap();

    assert_eq!(summary.group, "shop");
    assert_eq!(summary.logins.len(), 1);
    assert_eq!(summary.logins[0].ip_address.as_deref(), Some("20.1.2.3"));
    assert!(summary.load_balancer_ip.is_none());
}

#[tokio::test]
async fn test_deployment_stops_on_address_space_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"location": "southafricanorth"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{NETWORK}/virtualNetworks/shop_vnet").as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_string("NetcfgInvalidSubnet"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{NETWORK}/networkSecurityGroups/shop_nsg").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let admin = AdminCredentials::new("deployops", "Sup3rSecret!!").unwrap();
    let plan = DeploymentPlan::new("shop", Tier::Two, 1, admin).unwrap();
    let err = provisioner(&server).deploy(&plan).await.unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

#[tokio::test]
async fn test_info_reads_tier_and_addresses() {
    let server = MockServer::start().await;
    respond(&server, "GET", format!("{NETWORK}/loadBalancers"), 200, json!({
        "value": [{"name": "shop_lb"}]
    }))
    .await;
    respond(&server, "GET", format!("{COMPUTE}/virtualMachines"), 200, json!({
        "value": [{"name": "webserver0"}, {"name": "dbserver"}]
    }))
    .await;
    respond(&server, "GET", format!("{NETWORK}/publicIPAddresses"), 200, json!({
        "value": [
            {"name": "webserver0_ip", "properties": {"ipAddress": "20.1.2.3"}},
            {"name": "shop_lb_ip", "properties": {"ipAddress": "20.9.9.9"}}
        ]
    }))
    .await;

    let report = provisioner(&server).info("shop").await.unwrap();
    assert_eq!(
        report.to_string(),
        "Infrastructure details\n-------------------------\nTier: 3\nwebserver0 : 20.1.2.3\n"
    );
}

#[tokio::test]
async fn test_teardown_missing_group() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(404).set_body_string("ResourceGroupNotFound"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provisioner(&server).teardown("shop").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_teardown_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    provisioner(&server).teardown("shop").await.unwrap();
}
