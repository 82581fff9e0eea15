//! Monitoring instance composition
//!
//! A single monitoring host (prometheus/alertmanager stack installed by the
//! imported setup script) with a fixed internal address, plus the waiter that
//! holds the deployment until the host reports ready.

use crate::startup_scripts::MONITOR_STARTUP;
use crate::Composer;
use serde_json::json;
use stackform_core::{
    naming, DeploymentContext, Expansion, ResourceSpec, Result, ScriptRenderer,
};

/// Machine type when `machineType` is not authored
pub const DEFAULT_MACHINE_TYPE: &str = "n1-standard-1";

/// Boot image when `sourceImage` is not authored
pub const DEFAULT_SOURCE_IMAGE: &str = "projects/debian-cloud/global/images/family/debian-9";

/// Monitoring ports tagged into the firewall when `monitorPorts` is not
/// authored (prometheus, app exporter, alertmanager)
pub const DEFAULT_MONITOR_PORTS: &[u64] = &[9090, 9117, 9093];

/// Composer for the `monitor-instance` template kind
pub struct MonitorInstance;

impl Composer for MonitorInstance {
    fn kind(&self) -> &'static str {
        "monitor-instance"
    }

    fn display_name(&self) -> &'static str {
        "Monitoring instance"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let env = ctx.env();
        let name = env.name.clone();
        let project = &env.project;
        let zone = ctx.require_str("zone")?;
        let username = ctx.require_str("userName")?;
        let password = ctx.require_str("userPassword")?;
        let ssh_pubkey = ctx.require_str("sshPubKey")?;
        let network_ip = ctx.require_str("networkIP")?;
        let status_config_url = ctx.require_str("statusConfigUrl")?;
        let status_variable_path = ctx.require_str("statusVariablePath")?;
        let uptime_deadline = ctx.non_negative("statusUptimeDeadline")?;
        let machine_type = ctx
            .str_property("machineType")
            .unwrap_or(DEFAULT_MACHINE_TYPE);
        let source_image = ctx
            .str_property("sourceImage")
            .unwrap_or(DEFAULT_SOURCE_IMAGE);
        let network = match ctx.str_property("network") {
            Some(n) => n.to_string(),
            None => naming::network_name(&env.deployment),
        };
        let setup_script = ctx.import(ctx.require_str("setupScript")?)?;

        let mut renderer = ScriptRenderer::new();
        renderer.add_str("username", username);
        renderer.add_str("password", password);
        renderer.add_str("ssh_pubkey", ssh_pubkey);
        renderer.add_str("setup_script", setup_script);
        let startup_script = renderer.render_str(MONITOR_STARTUP)?;

        let mut tags = vec!["ssh-server".to_string(), "http-server".to_string()];
        for port in DEFAULT_MONITOR_PORTS {
            tags.push(format!("{network}-tcp-{port}"));
        }

        let instance = ResourceSpec::new(
            &name,
            "compute.v1.instance",
            json!({
                "zone": zone,
                "machineType": format!(
                    "https://www.googleapis.com/compute/v1/projects/{project}/zones/{zone}/machineTypes/{machine_type}"
                ),
                "disks": [{
                    "deviceName": "boot",
                    "type": "PERSISTENT",
                    "boot": true,
                    "autoDelete": true,
                    "initializeParams": {
                        "sourceImage": source_image,
                        "diskType": format!(
                            "https://www.googleapis.com/compute/v1/projects/{project}/zones/{zone}/diskTypes/pd-standard"
                        ),
                        "diskSizeGb": 10,
                    },
                }],
                "networkInterfaces": [{
                    "network": naming::self_link_ref(&network),
                    "subnetwork": naming::self_link_ref(&naming::subnet_name(&network)),
                    "accessConfigs": [{
                        "name": "External NAT",
                        "type": "ONE_TO_ONE_NAT",
                    }],
                    "networkIP": network_ip,
                }],
                "serviceAccounts": [{
                    "email": "default",
                    "scopes": ["https://www.googleapis.com/auth/cloud-platform"],
                }],
                "tags": { "items": tags },
                "metadata": {
                    "items": [
                        { "key": "startup-script", "value": startup_script },
                        { "key": "username", "value": username },
                        { "key": "status-config-url", "value": status_config_url },
                        { "key": "status-variable-path", "value": status_variable_path },
                        { "key": "status-uptime-deadline", "value": uptime_deadline.to_string() },
                    ],
                },
            }),
        );

        let waiter = ResourceSpec::new(
            format!("{name}-waiter"),
            "runtimeconfig.v1beta1.waiter",
            json!({
                "parent": naming::name_ref(&naming::config_name(&env.deployment)),
                "waiter": format!("{name}-waiter"),
                "timeout": format!("{uptime_deadline}s"),
                "success": {
                    "cardinality": {
                        "number": 1,
                        "path": format!("{status_variable_path}/success"),
                    },
                },
                "failure": {
                    "cardinality": {
                        "number": 1,
                        "path": format!("{status_variable_path}/failure"),
                    },
                },
            }),
        )
        .with_depends_on(vec![name.clone()]);

        Ok(Expansion::new(vec![instance, waiter], Vec::new()))
    }
}
