//! KDL manifest parser
//!
//! Parses the `stack.kdl` deployment manifest into a [`Manifest`]. Property
//! blocks are converted to JSON values so composers can stay agnostic of the
//! authoring format.

use crate::error::{ExpandError, Result};
use crate::manifest::{Manifest, ManifestResource};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parse a manifest file
pub fn parse_manifest_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| ExpandError::IoError {
        path: path.as_ref().to_path_buf(),
        message: e.to_string(),
    })?;
    parse_manifest_string(&content)
}

/// Parse a manifest from a KDL string
pub fn parse_manifest_string(content: &str) -> Result<Manifest> {
    let doc: KdlDocument = content.parse()?;

    let mut manifest = Manifest::default();

    for node in doc.nodes() {
        match node.name().value() {
            "deployment" => {
                manifest.deployment = first_string(node)
                    .ok_or_else(|| {
                        ExpandError::InvalidManifest("deployment requires a name".to_string())
                    })?
                    .to_string();

                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        if child.name().value() == "project" {
                            manifest.project =
                                first_string(child).unwrap_or_default().to_string();
                        }
                    }
                }
            }
            "project" => {
                // Also accepted at top level
                manifest.project = first_string(node).unwrap_or_default().to_string();
            }
            "imports" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        if child.name().value() == "file" {
                            if let Some(path) = first_string(child) {
                                manifest.imports.push(path.to_string());
                            }
                        }
                    }
                }
            }
            "resource" => {
                manifest.resources.push(parse_resource(node)?);
            }
            // Unknown top-level nodes are ignored so manifests can carry
            // annotations for other tools
            _ => {}
        }
    }

    if manifest.deployment.is_empty() {
        return Err(ExpandError::InvalidManifest(
            "manifest requires a deployment node".to_string(),
        ));
    }

    Ok(manifest)
}

/// Parse a resource node: `resource "name" kind="..." { properties { ... } }`
fn parse_resource(node: &KdlNode) -> Result<ManifestResource> {
    let name = first_string(node)
        .ok_or_else(|| ExpandError::InvalidManifest("resource requires a name".to_string()))?
        .to_string();

    let kind = node
        .entries()
        .iter()
        .find(|e| e.name().map(|n| n.value()) == Some("kind"))
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            ExpandError::InvalidManifest(format!("resource \"{name}\" requires kind=\"...\""))
        })?
        .to_string();

    let mut properties = HashMap::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "properties" {
                if let Some(props) = child.children() {
                    for prop in props.nodes() {
                        properties.insert(prop.name().value().to_string(), node_to_json(prop));
                    }
                }
            }
        }
    }

    Ok(ManifestResource {
        name,
        kind,
        properties,
    })
}

/// Convert one property node to a JSON value.
///
/// - children block -> object (recursing)
/// - single argument -> scalar
/// - multiple arguments -> array of scalars
fn node_to_json(node: &KdlNode) -> serde_json::Value {
    if let Some(children) = node.children() {
        let mut map = serde_json::Map::new();
        for child in children.nodes() {
            map.insert(child.name().value().to_string(), node_to_json(child));
        }
        return serde_json::Value::Object(map);
    }

    let values: Vec<serde_json::Value> = node
        .entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| kdl_value_to_json(e.value()))
        .collect();

    match values.len() {
        0 => serde_json::Value::Null,
        1 => values.into_iter().next().unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Array(values),
    }
}

/// Convert a KDL value to a JSON value
fn kdl_value_to_json(value: &KdlValue) -> serde_json::Value {
    if let Some(s) = value.as_string() {
        serde_json::Value::String(s.to_string())
    } else if let Some(i) = value.as_integer() {
        serde_json::Value::Number((i as i64).into())
    } else if let Some(f) = value.as_float() {
        serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    } else if let Some(b) = value.as_bool() {
        serde_json::Value::Bool(b)
    } else {
        serde_json::Value::Null
    }
}

/// First positional (unnamed) string argument of a node
fn first_string(node: &KdlNode) -> Option<&str> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MANIFEST: &str = r#"
deployment "demo" {
    project "proj1"
}

imports {
    file "scripts/node_setup.sh"
}

resource "status" kind="software-status" {
    properties {
        timeout 300
        statusPath "status/web"
        waiterDependsOn "web-instance" "db-instance"
    }
}
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = parse_manifest_string(MANIFEST).unwrap();
        assert_eq!(manifest.deployment, "demo");
        assert_eq!(manifest.project, "proj1");
        assert_eq!(manifest.imports, vec!["scripts/node_setup.sh"]);
        assert_eq!(manifest.resources.len(), 1);

        let resource = &manifest.resources[0];
        assert_eq!(resource.name, "status");
        assert_eq!(resource.kind, "software-status");
        assert_eq!(resource.properties["timeout"], json!(300));
        assert_eq!(resource.properties["statusPath"], json!("status/web"));
        assert_eq!(
            resource.properties["waiterDependsOn"],
            json!(["web-instance", "db-instance"])
        );
    }

    #[test]
    fn test_nested_property_block() {
        let kdl = r#"
deployment "demo" { project "p" }
resource "fw" kind="network" {
    properties {
        labels {
            team "infra"
            tier "edge"
        }
    }
}
"#;
        let manifest = parse_manifest_string(kdl).unwrap();
        assert_eq!(
            manifest.resources[0].properties["labels"],
            json!({"team": "infra", "tier": "edge"})
        );
    }

    #[test]
    fn test_missing_deployment_is_error() {
        let err = parse_manifest_string(r#"resource "a" kind="network" {}"#).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidManifest(_)));
    }

    #[test]
    fn test_missing_kind_is_error() {
        let kdl = r#"
deployment "demo" { project "p" }
resource "a" {}
"#;
        assert!(parse_manifest_string(kdl).is_err());
    }
}
