//! Stackform resource template composers
//!
//! Each composer is a pure function from a [`DeploymentContext`] to an
//! [`Expansion`]: validate the authored properties, build the resource
//! descriptors, and return them with any exported outputs. Composers never
//! touch the network or the filesystem; the orchestrator applies the result.
//!
//! # Layout
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │              stack CLI (expand)             │
//! └──────────────────┬─────────────────────────┘
//!                    │
//! ┌──────────────────▼─────────────────────────┐
//! │           stackform-templates               │
//! │  trait Composer { expand(ctx) -> ... }      │
//! │  software-status   network                  │
//! │  instance-template autoscaled-group         │
//! │  frontend-service  frontend-forwarding      │
//! │  monitor-instance                           │
//! └──────────────────┬─────────────────────────┘
//!                    │
//! ┌──────────────────▼─────────────────────────┐
//! │  stackform-core (context, specs, naming)    │
//! └────────────────────────────────────────────┘
//! ```

pub mod autoscaled_group;
pub mod forwarding;
pub mod frontend;
pub mod instance_template;
pub mod monitor;
pub mod network;
pub mod software_status;
pub mod startup_scripts;

use stackform_core::{DeploymentContext, Expansion, ExpandError, LoadedManifest, Result};
use tracing::{debug, info};

pub use autoscaled_group::AutoscaledGroup;
pub use forwarding::FrontendForwarding;
pub use frontend::FrontendService;
pub use instance_template::InstanceTemplate;
pub use monitor::MonitorInstance;
pub use network::Network;
pub use software_status::SoftwareStatus;

/// A resource template composer
///
/// Implementations are stateless; one static instance per kind backs the
/// registry. Validation happens before any resource is built, so a failed
/// expansion never yields a partial resource list.
pub trait Composer: Sync {
    /// Template kind as written in manifests (e.g. "software-status")
    fn kind(&self) -> &'static str;

    /// Human-readable name for summaries
    fn display_name(&self) -> &'static str;

    /// Expand the context into resources and outputs
    fn expand(&self, ctx: &DeploymentContext) -> Result<Expansion>;
}

/// Look up the composer for a template kind
pub fn composer_for(kind: &str) -> Option<&'static dyn Composer> {
    match kind {
        "software-status" => Some(&SoftwareStatus),
        "network" => Some(&Network),
        "instance-template" => Some(&InstanceTemplate),
        "autoscaled-group" => Some(&AutoscaledGroup),
        "frontend-service" => Some(&FrontendService),
        "frontend-forwarding" => Some(&FrontendForwarding),
        "monitor-instance" => Some(&MonitorInstance),
        _ => None,
    }
}

/// All registered template kinds, in a stable order
pub fn known_kinds() -> &'static [&'static str] {
    &[
        "software-status",
        "network",
        "instance-template",
        "autoscaled-group",
        "frontend-service",
        "frontend-forwarding",
        "monitor-instance",
    ]
}

/// Expand a loaded manifest into one combined resource graph.
///
/// Resources are expanded in authored order; the first error aborts the
/// whole expansion and nothing is returned.
pub fn expand_manifest(loaded: &LoadedManifest) -> Result<Expansion> {
    let mut expansion = Expansion::default();

    for resource in &loaded.manifest.resources {
        let composer = composer_for(&resource.kind)
            .ok_or_else(|| ExpandError::UnknownKind(resource.kind.clone()))?;

        debug!(name = %resource.name, kind = %resource.kind, "Expanding resource");
        let ctx = loaded.manifest.context_for(resource, &loaded.imports);
        expansion.merge(composer.expand(&ctx)?);
    }

    info!(
        resources = expansion.resources.len(),
        outputs = expansion.outputs.len(),
        "Expansion complete"
    );

    Ok(expansion)
}
