//! Manifest discovery
//!
//! Locates the deployment manifest the CLI should expand when no explicit
//! path is given.

pub mod error;

pub use error::*;

use std::path::PathBuf;

/// Get (and create if needed) the stackform user config directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("stackform");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Find the deployment manifest.
///
/// Search order:
/// 1. `STACK_MANIFEST` environment variable (direct path)
/// 2. current directory: `stack.local.kdl`, `.stack.local.kdl`,
///    `stack.kdl`, `.stack.kdl`
/// 3. `./.stackform/` directory, same candidate order
/// 4. `~/.config/stackform/stack.kdl`
pub fn find_manifest_file() -> Result<PathBuf> {
    if let Ok(manifest_path) = std::env::var("STACK_MANIFEST") {
        let path = PathBuf::from(manifest_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    let candidates = [
        "stack.local.kdl",
        ".stack.local.kdl",
        "stack.kdl",
        ".stack.kdl",
    ];

    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let stackform_dir = current_dir.join(".stackform");
    if stackform_dir.is_dir() {
        for filename in &candidates {
            let path = stackform_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_manifest = config_dir.join("stackform").join("stack.kdl");
        if global_manifest.exists() {
            return Ok(global_manifest);
        }
    }

    Err(ConfigError::ManifestNotFound)
}
