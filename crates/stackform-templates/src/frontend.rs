//! Frontend service composition
//!
//! Composite template: a node instance template, the autoscaled group
//! serving it, an HTTP health check, and the backend service that the
//! forwarding chain points at. Sub-composers are invoked directly and their
//! output folded into a single expansion.

use crate::autoscaled_group::AutoscaledGroup;
use crate::instance_template::InstanceTemplate;
use crate::Composer;
use serde_json::{json, Value};
use stackform_core::{naming, DeploymentContext, Expansion, ResourceSpec, Result};

/// Group size when `targetSize` is not authored
pub const DEFAULT_TARGET_SIZE: u64 = 5;

/// Composer for the `frontend-service` template kind
pub struct FrontendService;

impl Composer for FrontendService {
    fn kind(&self) -> &'static str {
        "frontend-service"
    }

    fn display_name(&self) -> &'static str {
        "Frontend service"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let env = ctx.env();
        let name = env.name.clone();
        let zone = ctx.require_str("zone")?.to_string();
        let port = ctx.require_count("port")?;
        let service = ctx.require_str("service")?.to_string();
        let target_size = ctx.count("targetSize", DEFAULT_TARGET_SIZE)?;

        let template_name = naming::instance_template_name(&name);
        let group_name = format!("{name}-pri");

        // Instance template: same authored properties, group size as the
        // readiness success count
        let mut template_props: std::collections::HashMap<String, Value> =
            ctx.properties().clone();
        template_props.insert("successNumber".to_string(), json!(target_size));
        let template_ctx = DeploymentContext::new(
            stackform_core::Env {
                deployment: env.deployment.clone(),
                project: env.project.clone(),
                name: name.clone(),
            },
            template_props,
            ctx.imports().clone(),
        );
        let mut expansion = InstanceTemplate.expand(&template_ctx)?;

        // Autoscaled group behind the template
        let group_ctx = DeploymentContext::new(
            stackform_core::Env {
                deployment: env.deployment.clone(),
                project: env.project.clone(),
                name: group_name.clone(),
            },
            std::collections::HashMap::from([
                ("zone".to_string(), json!(zone)),
                ("targetSize".to_string(), json!(target_size)),
                (
                    "instanceTemplate".to_string(),
                    json!(naming::self_link_ref(&template_name)),
                ),
            ]),
            ctx.imports().clone(),
        );
        expansion.merge(AutoscaledGroup.expand(&group_ctx)?);

        let hc_name = naming::health_check_name(&name);
        expansion.merge(Expansion::new(
            vec![
                ResourceSpec::new(
                    &hc_name,
                    "compute.v1.httpHealthCheck",
                    json!({ "port": port }),
                ),
                ResourceSpec::new(
                    naming::backend_service_name(&name),
                    "compute.v1.backendService",
                    json!({
                        "port": port,
                        "portName": service,
                        "backends": [{
                            "name": format!("{name}-primary"),
                            "group": naming::instance_group_ref(
                                &naming::instance_group_name(&group_name)
                            ),
                        }],
                        "healthChecks": [naming::self_link_ref(&hc_name)],
                    }),
                ),
            ],
            Vec::new(),
        ));

        Ok(expansion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackform_core::Env;
    use std::collections::HashMap;

    fn context() -> DeploymentContext {
        DeploymentContext::new(
            Env {
                deployment: "demo".to_string(),
                project: "proj1".to_string(),
                name: "web".to_string(),
            },
            HashMap::from([
                ("zone".to_string(), json!("us-central1-f")),
                ("port".to_string(), json!(8080)),
                ("service".to_string(), json!("http")),
                ("userName".to_string(), json!("deploy")),
                ("userPassword".to_string(), json!("s3cret")),
                ("sshPubKey".to_string(), json!("ssh-rsa AAAA")),
                ("statusConfigUrl".to_string(), json!("https://example/config")),
                ("statusVariablePath".to_string(), json!("status/web")),
                ("statusUptimeDeadline".to_string(), json!(420)),
                ("setupScript".to_string(), json!("node_setup.sh")),
            ]),
            HashMap::from([("node_setup.sh".to_string(), "echo setup".to_string())]),
        )
    }

    #[test]
    fn test_composite_resource_set() {
        let expansion = FrontendService.expand(&context()).unwrap();

        let names: Vec<&str> = expansion.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "web-it",
                "web-it-waiter",
                "web-pri-igm",
                "web-pri-as",
                "web-hc",
                "web-bes",
            ]
        );
    }

    #[test]
    fn test_backend_wiring() {
        let expansion = FrontendService.expand(&context()).unwrap();
        let bes = expansion
            .resources
            .iter()
            .find(|r| r.name == "web-bes")
            .unwrap();
        assert_eq!(bes.properties["portName"], "http");
        assert_eq!(
            bes.properties["backends"][0]["group"],
            "$(ref.web-pri-igm.instanceGroup)"
        );
        assert_eq!(
            bes.properties["healthChecks"],
            json!(["$(ref.web-hc.selfLink)"])
        );
    }

    #[test]
    fn test_waiter_success_tracks_target_size() {
        let mut properties = context().properties().clone();
        properties.insert("targetSize".to_string(), json!(3));
        let ctx = DeploymentContext::new(
            context().env().clone(),
            properties,
            context().imports().clone(),
        );

        let expansion = FrontendService.expand(&ctx).unwrap();
        let waiter = expansion
            .resources
            .iter()
            .find(|r| r.name == "web-it-waiter")
            .unwrap();
        assert_eq!(waiter.properties["success"]["cardinality"]["number"], 3);

        let igm = expansion
            .resources
            .iter()
            .find(|r| r.name == "web-pri-igm")
            .unwrap();
        assert_eq!(igm.properties["targetSize"], 3);
    }

    #[test]
    fn test_sub_template_failure_aborts_whole_expansion() {
        let mut properties = context().properties().clone();
        properties.insert("statusUptimeDeadline".to_string(), json!("later"));
        let ctx = DeploymentContext::new(
            context().env().clone(),
            properties,
            context().imports().clone(),
        );
        assert!(FrontendService.expand(&ctx).is_err());
    }
}
