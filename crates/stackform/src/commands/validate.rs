use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn handle(manifest: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "Validating manifest...".blue());

    let manifest_path = super::resolve_manifest(manifest)?;
    println!(
        "Manifest: {}",
        manifest_path.display().to_string().cyan()
    );

    let loaded = match stackform_core::load_manifest(&manifest_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Manifest error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    match stackform_templates::expand_manifest(&loaded) {
        Ok(expansion) => {
            println!("{}", "✓ Manifest expands cleanly".green().bold());
            println!();
            println!("Summary:");
            println!("  deployment: {}", loaded.manifest.deployment.cyan());
            println!("  project: {}", loaded.manifest.project.cyan());
            println!("  entries: {}", loaded.manifest.resources.len());
            for resource in &loaded.manifest.resources {
                println!("    - {} ({})", resource.name.cyan(), resource.kind);
            }

            let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
            for resource in &expansion.resources {
                *by_type.entry(resource.resource_type.as_str()).or_insert(0) += 1;
            }
            println!("  resources: {}", expansion.resources.len());
            for (resource_type, count) in by_type {
                println!("    - {} x{}", resource_type.cyan(), count);
            }

            if !expansion.outputs.is_empty() {
                println!("  outputs: {}", expansion.outputs.len());
                for output in &expansion.outputs {
                    println!("    - {}", output.name.cyan());
                }
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Expansion error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
