//! Network and firewall layout
//!
//! Emits the deployment network, its subnet, and the firewall rules that the
//! instance templates tag into: http, ssh, an internal-ports rule scoped to
//! the subnet CIDR, and one tcp rule per monitoring port.

use crate::Composer;
use serde_json::json;
use stackform_core::{naming, DeploymentContext, Expansion, ResourceSpec, Result};

/// Subnet CIDR when `ipCidrRange` is not authored
pub const DEFAULT_CIDR: &str = "10.0.0.0/25";

/// Subnet region when `region` is not authored
pub const DEFAULT_REGION: &str = "us-central1";

/// Monitoring stack ports opened when `monitorPorts` is not authored
/// (prometheus, alertmanager, node exporter, app exporter)
pub const DEFAULT_MONITOR_PORTS: &[u64] = &[9090, 9093, 9100, 9117];

/// Composer for the `network` template kind
pub struct Network;

impl Composer for Network {
    fn kind(&self) -> &'static str {
        "network"
    }

    fn display_name(&self) -> &'static str {
        "Network and firewall layout"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let network = match ctx.str_property("network") {
            Some(name) => name.to_string(),
            None => naming::network_name(&ctx.env().deployment),
        };
        let network = network.as_str();
        let cidr = ctx.str_property("ipCidrRange").unwrap_or(DEFAULT_CIDR);
        let region = ctx.str_property("region").unwrap_or(DEFAULT_REGION);
        let monitor_ports = monitor_ports(ctx)?;

        let network_ref = naming::self_link_ref(network);

        let mut resources = vec![
            // Project default network, automatic subnets
            ResourceSpec::new(
                "default",
                "compute.v1.network",
                json!({ "autoCreateSubnetworks": true }),
            ),
            ResourceSpec::new(
                network,
                "compute.v1.network",
                json!({ "autoCreateSubnetworks": false }),
            ),
            ResourceSpec::new(
                naming::subnet_name(network),
                "compute.v1.subnetwork",
                json!({
                    "ipCidrRange": cidr,
                    "network": network_ref,
                    "region": region,
                }),
            ),
            ResourceSpec::new(
                format!("{network}-allow-http"),
                "compute.v1.firewall",
                json!({
                    "network": network_ref,
                    "sourceRanges": ["0.0.0.0/0"],
                    "targetTags": ["http-server"],
                    "allowed": [{ "IPProtocol": "TCP", "ports": ["80"] }],
                }),
            ),
            ResourceSpec::new(
                format!("{network}-all-ports"),
                "compute.v1.firewall",
                json!({
                    "network": network_ref,
                    "sourceRanges": ["0.0.0.0/0"],
                    "targetTags": ["all-ports"],
                    "allowed": [{ "IPProtocol": "all" }],
                }),
            ),
            ResourceSpec::new(
                format!("{network}-ssh"),
                "compute.v1.firewall",
                json!({
                    "network": network_ref,
                    "sourceRanges": ["0.0.0.0/0"],
                    "targetTags": ["ssh-server"],
                    "allowed": [{ "IPProtocol": "TCP", "ports": ["22"] }],
                }),
            ),
            ResourceSpec::new(
                format!("{network}-allow-internal-ports"),
                "compute.v1.firewall",
                json!({
                    "network": network_ref,
                    "sourceRanges": [cidr],
                    "targetTags": [format!("{network}-allow-internal-ports")],
                    "allowed": [
                        { "IPProtocol": "TCP", "ports": ["1-65535"] },
                        { "IPProtocol": "UDP", "ports": ["1-65535"] },
                        { "IPProtocol": "ICMP" },
                    ],
                }),
            )
            .with_depends_on(vec![network.to_string()]),
        ];

        for port in monitor_ports {
            resources.push(ResourceSpec::new(
                format!("{network}-tcp-{port}"),
                "compute.v1.firewall",
                json!({
                    "network": network_ref,
                    "sourceRanges": ["0.0.0.0/0"],
                    "targetTags": [format!("{network}-tcp-{port}")],
                    "allowed": [{ "IPProtocol": "TCP", "ports": [port.to_string()] }],
                }),
            ));
        }

        Ok(Expansion::new(resources, Vec::new()))
    }
}

fn monitor_ports(ctx: &DeploymentContext) -> Result<Vec<u64>> {
    match ctx.property("monitorPorts") {
        None => Ok(DEFAULT_MONITOR_PORTS.to_vec()),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_u64().ok_or_else(|| {
                    stackform_core::ExpandError::invalid_property(
                        "monitorPorts",
                        format!("{item}"),
                    )
                })
            })
            .collect(),
        Some(serde_json::Value::Number(n)) => {
            let port = n.as_u64().ok_or_else(|| {
                stackform_core::ExpandError::invalid_property("monitorPorts", format!("{n}"))
            })?;
            Ok(vec![port])
        }
        Some(other) => Err(stackform_core::ExpandError::invalid_property(
            "monitorPorts",
            format!("expected port numbers, got {other}"),
        )),
    }
}
