//! HTTP load-balancer forwarding chain
//!
//! URL map, target HTTP proxy, and global forwarding rule routing every host
//! to a frontend service's backend service.

use crate::Composer;
use serde_json::json;
use stackform_core::{naming, DeploymentContext, Expansion, ResourceSpec, Result};

/// Composer for the `frontend-forwarding` template kind
pub struct FrontendForwarding;

impl Composer for FrontendForwarding {
    fn kind(&self) -> &'static str {
        "frontend-forwarding"
    }

    fn display_name(&self) -> &'static str {
        "Frontend forwarding chain"
    }

    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion> {
        let deployment = &ctx.env().deployment;
        let frontend = ctx.require_str("frontend")?;
        let port = ctx.require_count("port")?;

        let backend_ref = naming::self_link_ref(&naming::backend_service_name(frontend));
        let url_map_name = naming::url_map_name(deployment);
        let proxy_name = naming::target_proxy_name(deployment);

        let resources = vec![
            ResourceSpec::new(
                &url_map_name,
                "compute.v1.urlMap",
                json!({
                    "defaultService": backend_ref,
                    "hostRules": [{ "hosts": ["*"], "pathMatcher": "pathmap" }],
                    "pathMatchers": [{
                        "name": "pathmap",
                        "defaultService": backend_ref,
                    }],
                }),
            ),
            ResourceSpec::new(
                &proxy_name,
                "compute.v1.targetHttpProxy",
                json!({ "urlMap": naming::self_link_ref(&url_map_name) }),
            ),
            ResourceSpec::new(
                naming::forwarding_rule_name(deployment),
                "compute.v1.globalForwardingRule",
                json!({
                    "IPProtocol": "TCP",
                    "portRange": port.to_string(),
                    "target": naming::self_link_ref(&proxy_name),
                }),
            ),
        ];

        Ok(Expansion::new(resources, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use stackform_core::Env;
    use std::collections::HashMap;

    fn context(port: Value) -> DeploymentContext {
        DeploymentContext::new(
            Env {
                deployment: "demo".to_string(),
                project: "proj1".to_string(),
                name: "lb".to_string(),
            },
            HashMap::from([
                ("frontend".to_string(), json!("web")),
                ("port".to_string(), port),
            ]),
            HashMap::new(),
        )
    }

    #[test]
    fn test_forwarding_chain() {
        let expansion = FrontendForwarding.expand(&context(json!(80))).unwrap();
        assert_eq!(expansion.resources.len(), 3);

        let url_map = &expansion.resources[0];
        assert_eq!(url_map.name, "demo-urlmap");
        assert_eq!(url_map.properties["defaultService"], "$(ref.web-bes.selfLink)");

        let proxy = &expansion.resources[1];
        assert_eq!(proxy.name, "demo-targetproxy");
        assert_eq!(proxy.properties["urlMap"], "$(ref.demo-urlmap.selfLink)");

        let rule = &expansion.resources[2];
        assert_eq!(rule.name, "demo-forwarding");
        assert_eq!(rule.properties["portRange"], "80");
        assert_eq!(rule.properties["target"], "$(ref.demo-targetproxy.selfLink)");
    }

    #[test]
    fn test_port_accepts_string() {
        let expansion = FrontendForwarding.expand(&context(json!("8080"))).unwrap();
        assert_eq!(expansion.resources[2].properties["portRange"], "8080");
    }
}
