//! Autoscaled instance group
//!
//! An instance group manager plus an autoscaler pinned to the target size
//! (min == max), so the group self-heals without actually scaling.

use crate::Composer;
use serde_json::json;
use stackform_core::{naming, DeploymentContext, Expansion, ResourceSpec, Result};

/// Composer for the `autoscaled-group` template kind
pub struct AutoscaledGroup;

impl Composer for AutoscaledGroup {
    fn kind(&self) -> &'static str {
        "autoscaled-group"
    }

    fn display_name(&self) -> &'static str {
        "Autoscaled instance group"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let name = &ctx.env().name;
        let zone = ctx.require_str("zone")?;
        let target_size = ctx.require_count("targetSize")?;
        let instance_template = ctx.require_str("instanceTemplate")?;

        let igm_name = naming::instance_group_name(name);

        let igm = ResourceSpec::new(
            &igm_name,
            "compute.v1.instanceGroupManager",
            json!({
                "zone": zone,
                "targetSize": target_size,
                "baseInstanceName": format!("{name}-instance"),
                "instanceTemplate": instance_template,
            }),
        );

        let autoscaler = ResourceSpec::new(
            naming::autoscaler_name(name),
            "compute.v1.autoscaler",
            json!({
                "zone": zone,
                "target": naming::self_link_ref(&igm_name),
                "autoscalingPolicy": {
                    "minNumReplicas": target_size,
                    "maxNumReplicas": target_size,
                },
            }),
        );

        Ok(Expansion::new(vec![igm, autoscaler], Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use stackform_core::{Env, ExpandError};
    use std::collections::HashMap;

    fn context(target_size: Value) -> DeploymentContext {
        DeploymentContext::new(
            Env {
                deployment: "demo".to_string(),
                project: "proj1".to_string(),
                name: "web-pri".to_string(),
            },
            HashMap::from([
                ("zone".to_string(), json!("us-central1-f")),
                ("targetSize".to_string(), target_size),
                (
                    "instanceTemplate".to_string(),
                    json!("$(ref.web-it.selfLink)"),
                ),
            ]),
            HashMap::new(),
        )
    }

    #[test]
    fn test_group_and_autoscaler() {
        let expansion = AutoscaledGroup.expand(&context(json!(5))).unwrap();
        assert_eq!(expansion.resources.len(), 2);

        let igm = &expansion.resources[0];
        assert_eq!(igm.name, "web-pri-igm");
        assert_eq!(igm.properties["baseInstanceName"], "web-pri-instance");
        assert_eq!(igm.properties["targetSize"], 5);

        let autoscaler = &expansion.resources[1];
        assert_eq!(autoscaler.name, "web-pri-as");
        assert_eq!(
            autoscaler.properties["target"],
            "$(ref.web-pri-igm.selfLink)"
        );
        assert_eq!(
            autoscaler.properties["autoscalingPolicy"],
            json!({"minNumReplicas": 5, "maxNumReplicas": 5})
        );
    }

    #[test]
    fn test_zero_target_size_rejected() {
        assert!(matches!(
            AutoscaledGroup.expand(&context(json!(0))).unwrap_err(),
            ExpandError::InvalidProperty { ref field, .. } if field == "targetSize"
        ));
    }
}
