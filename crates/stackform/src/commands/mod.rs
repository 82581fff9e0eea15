pub mod expand;
pub mod validate;

use anyhow::Context;
use std::path::PathBuf;

/// Resolve the manifest path: explicit flag first, then discovery.
pub fn resolve_manifest(manifest: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match manifest {
        Some(path) => Ok(path),
        None => stackform_config::find_manifest_file().context("could not locate a manifest"),
    }
}
