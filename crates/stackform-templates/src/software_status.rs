//! Software-readiness waiter composition
//!
//! Emits a shared runtime-config namespace for a deployment plus a waiter
//! bound to it. Machines report readiness by incrementing counters under a
//! status variable path (`{statusPath}/success`, `{statusPath}/failure`);
//! the orchestrator blocks on the waiter until the success cardinality is
//! reached or the timeout expires.

use crate::Composer;
use serde_json::json;
use stackform_core::{naming, DeploymentContext, Expansion, OutputSpec, ResourceSpec, Result};

/// Success counter threshold when `successNumber` is not authored
pub const DEFAULT_SUCCESS_NUMBER: u64 = 8;

/// Failure counter threshold when `failureNumber` is not authored
pub const DEFAULT_FAILURE_NUMBER: u64 = 1;

/// Composer for the `software-status` template kind
pub struct SoftwareStatus;

impl Composer for SoftwareStatus {
    fn kind(&self) -> &'static str {
        "software-status"
    }

    fn display_name(&self) -> &'static str {
        "Software readiness waiter"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        // Validate everything up front; a bad property must abort the
        // expansion before any resource exists.
        let deployment = ctx.require_str("deployment")?;
        let project = ctx.require_str("project")?;
        let status_path = ctx.require_str("statusPath")?;
        let timeout = ctx.non_negative("timeout")?;
        let success_number = ctx.count("successNumber", DEFAULT_SUCCESS_NUMBER)?;
        let failure_number = ctx.count("failureNumber", DEFAULT_FAILURE_NUMBER)?;
        let depends_on = ctx.string_list("waiterDependsOn")?;

        let config_name = naming::config_name(deployment);

        let config = ResourceSpec::new(
            &config_name,
            "runtimeconfig.v1beta1.config",
            json!({
                "config": config_name,
                "description": format!("Holds software readiness status for {deployment}"),
            }),
        );

        let waiter = ResourceSpec::new(
            naming::waiter_name(deployment),
            "runtimeconfig.v1beta1.waiter",
            json!({
                "parent": naming::name_ref(&config_name),
                "waiter": "software",
                "timeout": format!("{timeout}s"),
                "success": {
                    "cardinality": {
                        "number": success_number,
                        "path": format!("{status_path}/success"),
                    },
                },
                "failure": {
                    "cardinality": {
                        "number": failure_number,
                        "path": format!("{status_path}/failure"),
                    },
                },
            }),
        )
        .with_depends_on(depends_on);

        Ok(Expansion::new(
            vec![config, waiter],
            vec![
                OutputSpec::new("config-url", naming::config_url(project, deployment)),
                OutputSpec::new("variable-path", status_path),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use stackform_core::{Env, ExpandError};
    use std::collections::HashMap;

    fn demo_context(extra: &[(&str, Value)]) -> DeploymentContext {
        let mut properties: HashMap<String, Value> = HashMap::from([
            ("deployment".to_string(), json!("demo")),
            ("project".to_string(), json!("proj1")),
            ("statusPath".to_string(), json!("status/web")),
            ("timeout".to_string(), json!(300)),
            (
                "waiterDependsOn".to_string(),
                json!(["web-instance"]),
            ),
        ]);
        for (k, v) in extra {
            properties.insert(k.to_string(), v.clone());
        }
        DeploymentContext::new(
            Env {
                deployment: "demo".to_string(),
                project: "proj1".to_string(),
                name: "status".to_string(),
            },
            properties,
            HashMap::new(),
        )
    }

    #[test]
    fn test_demo_expansion() {
        let expansion = SoftwareStatus.expand(&demo_context(&[])).unwrap();

        assert_eq!(expansion.resources.len(), 2);

        let config = &expansion.resources[0];
        assert_eq!(config.name, "demo-config");
        assert_eq!(config.resource_type, "runtimeconfig.v1beta1.config");
        assert_eq!(config.properties["config"], "demo-config");
        assert_eq!(
            config.properties["description"],
            "Holds software readiness status for demo"
        );

        let waiter = &expansion.resources[1];
        assert_eq!(waiter.name, "demo-waiter");
        assert_eq!(waiter.resource_type, "runtimeconfig.v1beta1.waiter");
        assert_eq!(
            waiter.metadata.as_ref().unwrap().depends_on,
            vec!["web-instance"]
        );
        assert_eq!(waiter.properties["parent"], "$(ref.demo-config.name)");
        assert_eq!(waiter.properties["waiter"], "software");
        assert_eq!(waiter.properties["timeout"], "300s");
        assert_eq!(
            waiter.properties["success"]["cardinality"],
            json!({"number": 8, "path": "status/web/success"})
        );
        assert_eq!(
            waiter.properties["failure"]["cardinality"],
            json!({"number": 1, "path": "status/web/failure"})
        );

        assert_eq!(expansion.outputs[0].name, "config-url");
        assert_eq!(
            expansion.outputs[0].value,
            "https://runtimeconfig.googleapis.com/v1beta1/projects/proj1/configs/demo-config"
        );
        assert_eq!(expansion.outputs[1].name, "variable-path");
        assert_eq!(expansion.outputs[1].value, "status/web");
    }

    #[test]
    fn test_timeout_string_coercion() {
        let expansion = SoftwareStatus
            .expand(&demo_context(&[("timeout", json!("120"))]))
            .unwrap();
        assert_eq!(expansion.resources[1].properties["timeout"], "120s");
    }

    #[test]
    fn test_zero_timeout_accepted() {
        let expansion = SoftwareStatus
            .expand(&demo_context(&[("timeout", json!(0))]))
            .unwrap();
        assert_eq!(expansion.resources[1].properties["timeout"], "0s");
    }

    #[test]
    fn test_invalid_timeout_yields_no_resources() {
        let err = SoftwareStatus
            .expand(&demo_context(&[("timeout", json!("soon"))]))
            .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::InvalidProperty { ref field, .. } if field == "timeout"
        ));
    }

    #[test]
    fn test_explicit_counts() {
        let expansion = SoftwareStatus
            .expand(&demo_context(&[
                ("successNumber", json!(1)),
                ("failureNumber", json!(1)),
            ]))
            .unwrap();
        let waiter = &expansion.resources[1];
        assert_eq!(waiter.properties["success"]["cardinality"]["number"], 1);
        assert_eq!(waiter.properties["failure"]["cardinality"]["number"], 1);
    }

    #[test]
    fn test_non_positive_counts_rejected() {
        for field in ["successNumber", "failureNumber"] {
            let err = SoftwareStatus
                .expand(&demo_context(&[(field, json!(0))]))
                .unwrap_err();
            assert!(matches!(
                err,
                ExpandError::InvalidProperty { field: ref f, .. } if f == field
            ));
        }
    }

    #[test]
    fn test_omitted_depends_on_is_empty_list_not_absent() {
        let mut ctx = demo_context(&[]);
        // Rebuild without waiterDependsOn
        let mut properties = ctx.properties().clone();
        properties.remove("waiterDependsOn");
        ctx = DeploymentContext::new(ctx.env().clone(), properties, HashMap::new());

        let expansion = SoftwareStatus.expand(&ctx).unwrap();
        let metadata = expansion.resources[1].metadata.as_ref().unwrap();
        assert!(metadata.depends_on.is_empty());

        // The key survives serialization as an empty list
        let rendered = serde_json::to_value(&expansion.resources[1]).unwrap();
        assert_eq!(rendered["metadata"]["dependsOn"], json!([]));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let ctx = demo_context(&[]);
        let first = serde_json::to_string(&SoftwareStatus.expand(&ctx).unwrap()).unwrap();
        let second = serde_json::to_string(&SoftwareStatus.expand(&ctx).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_status_path() {
        let mut properties = demo_context(&[]).properties().clone();
        properties.remove("statusPath");
        let ctx = DeploymentContext::new(Env::default(), properties, HashMap::new());
        assert!(matches!(
            SoftwareStatus.expand(&ctx).unwrap_err(),
            ExpandError::MissingProperty(ref p) if p == "statusPath"
        ));
    }
}
