use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid {field} value: {message}")]
    InvalidProperty { field: String, message: String },

    #[error("Missing required property: {0}")]
    MissingProperty(String),

    #[error("Unknown template kind: {0}")]
    UnknownKind(String),

    #[error("Import not found: {0} (declare it in the manifest imports block)")]
    ImportNotFound(String),

    #[error("Script render error: {0}")]
    ScriptRenderError(String),
}

impl ExpandError {
    /// Shorthand for a malformed property value.
    pub fn invalid_property(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProperty {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExpandError>;
