//! Instance template composition
//!
//! Emits a `compute.v1.instanceTemplate` for an autoscaled node group plus
//! the runtime-config waiter that gates the deployment on the group reporting
//! software readiness. The startup script provisions the access user and runs
//! the imported per-role setup script.

use crate::startup_scripts::NODE_STARTUP;
use crate::Composer;
use serde_json::json;
use stackform_core::{
    naming, DeploymentContext, Expansion, OutputSpec, ResourceSpec, Result, ScriptRenderer,
};

/// Machine type when `machineType` is not authored
pub const DEFAULT_MACHINE_TYPE: &str = "g1-small";

/// Boot image when `sourceImage` is not authored
pub const DEFAULT_SOURCE_IMAGE: &str = "projects/debian-cloud/global/images/family/debian-9";

/// Boot disk size in GB when `diskSizeGb` is not authored
pub const DEFAULT_DISK_SIZE_GB: u64 = 10;

/// Instances that must report ready before the waiter succeeds, when
/// `successNumber` is not authored; matches the default group target size
pub const DEFAULT_SUCCESS_NUMBER: u64 = 5;

/// Composer for the `instance-template` template kind
pub struct InstanceTemplate;

impl Composer for InstanceTemplate {
    fn kind(&self) -> &'static str {
        "instance-template"
    }

    fn display_name(&self) -> &'static str {
        "Node instance template"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let env = ctx.env();
        let zone = ctx.require_str("zone")?;
        let username = ctx.require_str("userName")?;
        let password = ctx.require_str("userPassword")?;
        let ssh_pubkey = ctx.require_str("sshPubKey")?;
        let status_config_url = ctx.require_str("statusConfigUrl")?;
        let status_variable_path = ctx.require_str("statusVariablePath")?;
        let uptime_deadline = ctx.non_negative("statusUptimeDeadline")?;
        let success_number = ctx.count("successNumber", DEFAULT_SUCCESS_NUMBER)?;
        let disk_size = ctx.count("diskSizeGb", DEFAULT_DISK_SIZE_GB)?;
        let machine_type = ctx
            .str_property("machineType")
            .unwrap_or(DEFAULT_MACHINE_TYPE);
        let source_image = ctx
            .str_property("sourceImage")
            .unwrap_or(DEFAULT_SOURCE_IMAGE);
        let network = match ctx.str_property("network") {
            Some(name) => name.to_string(),
            None => naming::network_name(&env.deployment),
        };
        let setup_script = ctx.import(ctx.require_str("setupScript")?)?;

        let mut renderer = ScriptRenderer::new();
        renderer.add_str("username", username);
        renderer.add_str("password", password);
        renderer.add_str("ssh_pubkey", ssh_pubkey);
        renderer.add_str("setup_script", setup_script);
        let startup_script = renderer.render_str(NODE_STARTUP)?;

        let template_name = naming::instance_template_name(&env.name);

        let template = ResourceSpec::new(
            &template_name,
            "compute.v1.instanceTemplate",
            json!({
                "properties": {
                    "zone": zone,
                    "machineType": machine_type,
                    "canIpForward": true,
                    "disks": [{
                        "deviceName": "boot",
                        "type": "PERSISTENT",
                        "boot": true,
                        "autoDelete": true,
                        "initializeParams": {
                            "sourceImage": source_image,
                            "diskType": "pd-standard",
                            "diskSizeGb": disk_size,
                        },
                    }],
                    "networkInterfaces": [{
                        "network": naming::self_link_ref(&network),
                        "subnetwork": naming::self_link_ref(&naming::subnet_name(&network)),
                        "accessConfigs": [{
                            "name": "External NAT",
                            "type": "ONE_TO_ONE_NAT",
                        }],
                    }],
                    "serviceAccounts": [{
                        "email": "default",
                        "scopes": ["https://www.googleapis.com/auth/cloud-platform"],
                    }],
                    "tags": { "items": ["http-server", "ssh-server", "all-ports"] },
                    "metadata": {
                        "items": [
                            { "key": "username", "value": username },
                            { "key": "status-config-url", "value": status_config_url },
                            { "key": "status-variable-path", "value": status_variable_path },
                            { "key": "status-uptime-deadline", "value": uptime_deadline.to_string() },
                            { "key": "startup-script", "value": startup_script },
                        ],
                    },
                },
            }),
        );

        let waiter = ResourceSpec::new(
            format!("{template_name}-waiter"),
            "runtimeconfig.v1beta1.waiter",
            json!({
                "parent": naming::name_ref(&naming::config_name(&env.deployment)),
                "waiter": format!("{template_name}-waiter"),
                "timeout": format!("{uptime_deadline}s"),
                "success": {
                    "cardinality": {
                        "number": success_number,
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
        .with_depends_on(vec![template_name.clone()]);

        Ok(Expansion::new(
            vec![template, waiter],
            vec![OutputSpec::new(
                "instanceTemplateSelfLink",
                naming::self_link_ref(&template_name),
            )],
        ))
    }
}
