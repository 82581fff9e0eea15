//! Stackform core
//!
//! Data model and plumbing for declarative cloud resource expansion: the
//! deployment context, the resource/output specifications consumed by the
//! orchestrator, manifest parsing and loading, derived-name helpers, and
//! startup-script rendering.

pub mod context;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod naming;
pub mod parser;
pub mod resource;
pub mod template;

// Re-exports
pub use context::{DeploymentContext, Env};
pub use error::{ExpandError, Result};
pub use loader::{LoadedManifest, load_manifest};
pub use manifest::{Manifest, ManifestResource};
pub use parser::{parse_manifest_file, parse_manifest_string};
pub use resource::{Expansion, OutputSpec, ResourceMetadata, ResourceSpec};
pub use template::ScriptRenderer;
