use crate::OutputFormat;
use std::path::PathBuf;
use tracing::debug;

pub fn handle(manifest: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let manifest_path = super::resolve_manifest(manifest)?;
    debug!(manifest = %manifest_path.display(), "Expanding manifest");

    let loaded = stackform_core::load_manifest(&manifest_path)?;
    let expansion = stackform_templates::expand_manifest(&loaded)?;

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&expansion)?,
        OutputFormat::Json => serde_json::to_string_pretty(&expansion)?,
    };
    println!("{rendered}");

    Ok(())
}
