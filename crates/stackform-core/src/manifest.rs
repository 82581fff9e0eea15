//! Deployment manifest model
//!
//! A manifest is the authored description of one deployment: its identity,
//! the files it imports, and the resource entries to expand.

use crate::context::{DeploymentContext, Env};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Parsed deployment manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Deployment name
    pub deployment: String,

    /// Cloud project identifier
    pub project: String,

    /// Files whose contents are made available to composers, keyed later by
    /// their base name (e.g. "node_setup.sh")
    pub imports: Vec<String>,

    /// Resource entries, in authored order
    pub resources: Vec<ManifestResource>,
}

/// One resource entry in a manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestResource {
    /// Entry name; becomes the env name of the expansion context
    pub name: String,

    /// Template kind (e.g. "software-status", "network")
    pub kind: String,

    /// Authored properties
    pub properties: HashMap<String, Value>,
}

impl Manifest {
    /// Build the expansion context for one resource entry.
    ///
    /// `deployment` and `project` are auto-filled from the manifest header
    /// into the properties when the entry does not set them itself, so
    /// authors write them once.
    pub fn context_for(
        &self,
        resource: &ManifestResource,
        imports: &HashMap<String, String>,
    ) -> DeploymentContext {
        let mut properties = resource.properties.clone();
        properties
            .entry("deployment".to_string())
            .or_insert_with(|| Value::String(self.deployment.clone()));
        properties
            .entry("project".to_string())
            .or_insert_with(|| Value::String(self.project.clone()));

        DeploymentContext::new(
            Env {
                deployment: self.deployment.clone(),
                project: self.project.clone(),
                name: resource.name.clone(),
            },
            properties,
            imports.clone(),
        )
    }
}
