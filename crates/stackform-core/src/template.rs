//! Startup-script rendering
//!
//! Uses Tera to interpolate deployment values (username, keys, imported
//! setup scripts) into the embedded startup-script templates before they are
//! placed in instance metadata.

use crate::error::{ExpandError, Result};
use serde_json::Value;
use tera::{Context, Tera};

/// Renders script templates against a variable context
pub struct ScriptRenderer {
    tera: Tera,
    context: Context,
}

impl ScriptRenderer {
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
            context: Context::new(),
        }
    }

    /// Add a variable
    pub fn add_variable(&mut self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), &value);
    }

    /// Add a string variable
    pub fn add_str(&mut self, key: impl Into<String>, value: &str) {
        self.context
            .insert(key.into(), &Value::String(value.to_string()));
    }

    /// Render a template string
    pub fn render_str(&mut self, template: &str) -> Result<String> {
        self.tera
            .render_str(template, &self.context)
            .map_err(|e| ExpandError::ScriptRenderError(render_error_detail(&e)))
    }
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the Tera error chain and surface the undefined-variable case with a
/// usable message; Tera's top-level error alone only says "render failed".
fn render_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    let full_error = details.join(" | ");

    if full_error.contains("not found in context") {
        if let Some(start) = full_error.find("Variable `") {
            if let Some(end) = full_error[start..].find("` not found") {
                let var_name = &full_error[start + 10..start + end];
                return format!("undefined variable `{var_name}` in startup script");
            }
        }
    }

    full_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variable_interpolation() {
        let mut renderer = ScriptRenderer::new();
        renderer.add_str("username", "deploy");
        renderer.add_variable("port", json!(8080));

        let result = renderer
            .render_str("useradd {{ username }} # port {{ port }}")
            .unwrap();
        assert_eq!(result, "useradd deploy # port 8080");
    }

    #[test]
    fn test_undefined_variable_names_the_variable() {
        let mut renderer = ScriptRenderer::new();
        let err = renderer.render_str("echo {{ missing }}").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_script_body_with_shell_braces() {
        // ${HOME} and $? must pass through untouched
        let mut renderer = ScriptRenderer::new();
        let script = "result=$?\necho ${HOME}";
        assert_eq!(renderer.render_str(script).unwrap(), script);
    }
}
