//! Deployment context model
//!
//! A [`DeploymentContext`] is the sole input to a composer: the identity of
//! the resource being expanded plus a flat bag of authored properties and the
//! contents of imported files. It is built once by the loader and never
//! mutated during an expansion call.

use crate::error::{ExpandError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Deployment identity for one resource expansion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Env {
    /// Deployment name (manifest header)
    pub deployment: String,

    /// Cloud project identifier
    pub project: String,

    /// Name of the resource entry being expanded
    pub name: String,
}

/// Immutable input to a single expansion call
#[derive(Debug, Clone, Default)]
pub struct DeploymentContext {
    env: Env,
    properties: HashMap<String, Value>,
    imports: HashMap<String, String>,
}

impl DeploymentContext {
    pub fn new(
        env: Env,
        properties: HashMap<String, Value>,
        imports: HashMap<String, String>,
    ) -> Self {
        Self {
            env,
            properties,
            imports,
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    pub fn imports(&self) -> &HashMap<String, String> {
        &self.imports
    }

    /// Get a raw property value
    pub fn property(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    /// Get a string property if present
    pub fn str_property(&self, field: &str) -> Option<&str> {
        self.properties.get(field).and_then(|v| v.as_str())
    }

    /// Get a required string property
    pub fn require_str(&self, field: &str) -> Result<&str> {
        match self.properties.get(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ExpandError::invalid_property(
                field,
                format!("expected a string, got {other}"),
            )),
            None => Err(ExpandError::MissingProperty(field.to_string())),
        }
    }

    /// Get a required non-negative integer property.
    ///
    /// Deployment manifests routinely carry numbers as strings (they pass
    /// through shell pipelines before reaching the expander), so both
    /// `300` and `"300"` are accepted.
    pub fn non_negative(&self, field: &str) -> Result<u64> {
        match self.properties.get(field) {
            Some(value) => coerce_u64(value)
                .ok_or_else(|| ExpandError::invalid_property(field, format!("{value}"))),
            None => Err(ExpandError::MissingProperty(field.to_string())),
        }
    }

    /// Get a positive (>= 1) integer property, falling back to a default
    /// when the property is absent. Zero and negative values are rejected.
    pub fn count(&self, field: &str, default: u64) -> Result<u64> {
        let number = match self.properties.get(field) {
            Some(value) => coerce_u64(value)
                .ok_or_else(|| ExpandError::invalid_property(field, format!("{value}")))?,
            None => default,
        };
        if number < 1 {
            return Err(ExpandError::invalid_property(
                field,
                "value must be greater than 0",
            ));
        }
        Ok(number)
    }

    /// Get a required positive (>= 1) integer property.
    pub fn require_count(&self, field: &str) -> Result<u64> {
        match self.properties.get(field) {
            Some(_) => self.count(field, 1),
            None => Err(ExpandError::MissingProperty(field.to_string())),
        }
    }

    /// Get a list-of-strings property; absence yields an empty list.
    /// A bare string is treated as a single-element list, matching how KDL
    /// single-argument nodes parse.
    pub fn string_list(&self, field: &str) -> Result<Vec<String>> {
        match self.properties.get(field) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ExpandError::invalid_property(field, format!("expected strings, got {item}"))
                    })
                })
                .collect(),
            Some(other) => Err(ExpandError::invalid_property(
                field,
                format!("expected a list of strings, got {other}"),
            )),
        }
    }

    /// Get the contents of an imported file
    pub fn import(&self, name: &str) -> Result<&str> {
        self.imports
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ExpandError::ImportNotFound(name.to_string()))
    }
}

/// Coerce a JSON value to u64 the way the manifest format allows:
/// an unsigned integer, or a string holding one.
fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
