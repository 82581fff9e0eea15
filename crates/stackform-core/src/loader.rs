//! Manifest loading
//!
//! Parses the manifest and reads its imported files, producing everything a
//! composer registry needs to run an expansion.

use crate::error::{ExpandError, Result};
use crate::manifest::Manifest;
use crate::parser::parse_manifest_file;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// A manifest together with the contents of its imports
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: Manifest,

    /// Import contents keyed by file base name, as composers reference them
    pub imports: HashMap<String, String>,
}

/// Load a manifest and its imports from disk.
///
/// Import paths are resolved relative to the manifest file, and keyed by
/// their base name (`scripts/node_setup.sh` -> `node_setup.sh`).
#[instrument(skip(path), fields(manifest = %path.as_ref().display()))]
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<LoadedManifest> {
    let path = path.as_ref();
    debug!("Parsing manifest");
    let manifest = parse_manifest_file(path)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut imports = HashMap::new();
    for import in &manifest.imports {
        let import_path = base_dir.join(import);
        debug!(import = %import_path.display(), "Reading import");
        let content =
            std::fs::read_to_string(&import_path).map_err(|e| ExpandError::IoError {
                path: import_path.clone(),
                message: e.to_string(),
            })?;

        let key = Path::new(import)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(import.as_str())
            .to_string();
        imports.insert(key, content);
    }

    info!(
        deployment = %manifest.deployment,
        resources = manifest.resources.len(),
        imports = imports.len(),
        "Manifest loaded"
    );

    Ok(LoadedManifest { manifest, imports })
}
