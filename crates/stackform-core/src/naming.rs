//! Derived resource naming
//!
//! Several templates must independently compute the same derived name (the
//! runtime-config namespace, the subnet of a network, the instance group
//! behind a backend service). Centralizing the formatting here keeps those
//! names consistent across composers.

/// Runtime Config API endpoint used for informational URLs
pub const RTC_ENDPOINT: &str = "https://runtimeconfig.googleapis.com/v1beta1";

/// Shared runtime-config namespace for a deployment
pub fn config_name(deployment: &str) -> String {
    format!("{deployment}-config")
}

/// Deployment-level readiness waiter.
///
/// This name is only used for the orchestrator manifest entry; the waiter
/// name inside RuntimeConfig is static, scoped to the config resource.
pub fn waiter_name(deployment: &str) -> String {
    format!("{deployment}-waiter")
}

/// Full URL to a deployment's runtime config, including hostname
pub fn config_url(project: &str, deployment: &str) -> String {
    format!(
        "{RTC_ENDPOINT}/projects/{project}/configs/{config}",
        config = config_name(deployment)
    )
}

/// Default network for a deployment, used when a manifest does not name one
pub fn network_name(deployment: &str) -> String {
    format!("{deployment}-network")
}

pub fn subnet_name(network: &str) -> String {
    format!("{network}-subnet")
}

pub fn instance_template_name(name: &str) -> String {
    format!("{name}-it")
}

pub fn instance_group_name(name: &str) -> String {
    format!("{name}-igm")
}

pub fn autoscaler_name(name: &str) -> String {
    format!("{name}-as")
}

pub fn health_check_name(name: &str) -> String {
    format!("{name}-hc")
}

pub fn backend_service_name(name: &str) -> String {
    format!("{name}-bes")
}

pub fn url_map_name(deployment: &str) -> String {
    format!("{deployment}-urlmap")
}

pub fn target_proxy_name(deployment: &str) -> String {
    format!("{deployment}-targetproxy")
}

pub fn forwarding_rule_name(deployment: &str) -> String {
    format!("{deployment}-forwarding")
}

/// Cross-resource reference to another resource's selfLink
pub fn self_link_ref(name: &str) -> String {
    format!("$(ref.{name}.selfLink)")
}

/// Cross-resource reference to another resource's name
pub fn name_ref(name: &str) -> String {
    format!("$(ref.{name}.name)")
}

/// Cross-resource reference to an instance group manager's group
pub fn instance_group_ref(name: &str) -> String {
    format!("$(ref.{name}.instanceGroup)")
}
