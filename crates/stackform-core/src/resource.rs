//! Resource and output specifications
//!
//! The output unit consumed by the deployment orchestrator: a list of
//! [`ResourceSpec`] to create/update/delete cloud objects, plus a list of
//! [`OutputSpec`] exported for downstream consumption. Field names on the
//! wire (`type`, `dependsOn`) follow the orchestrator's schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single cloud resource descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Resource name, unique within a deployment (uniqueness is the
    /// orchestrator's concern, not enforced here)
    pub name: String,

    /// Resource type tag (e.g. "compute.v1.instance")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Creation-ordering metadata, present only when the resource
    /// declares dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResourceMetadata>,

    /// Resource-specific configuration
    pub properties: Value,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            metadata: None,
            properties,
        }
    }

    /// Attach a dependsOn list. The list may be empty; the key is still
    /// emitted so consumers never see a null.
    pub fn with_depends_on(mut self, depends_on: Vec<String>) -> Self {
        self.metadata = Some(ResourceMetadata { depends_on });
        self
    }
}

/// Orchestrator-facing resource metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    #[serde(rename = "dependsOn")]
    pub depends_on: Vec<String>,
}

/// An exported value, informational only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub value: String,
}

impl OutputSpec {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result of expanding one template (or a whole manifest)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub resources: Vec<ResourceSpec>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub outputs: Vec<OutputSpec>,
}

impl Expansion {
    pub fn new(resources: Vec<ResourceSpec>, outputs: Vec<OutputSpec>) -> Self {
        Self { resources, outputs }
    }

    /// Append another expansion, preserving order. Composite templates use
    /// this to fold sub-template results into their own.
    pub fn merge(&mut self, other: Expansion) {
        self.resources.extend(other.resources);
        self.outputs.extend(other.outputs);
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.outputs.is_empty()
    }
}
