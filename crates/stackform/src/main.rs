mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stack")]
#[command(about = "Expand deployment manifests into cloud resource graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand the manifest and print the resource graph
    Expand {
        /// Manifest path (defaults to stack.kdl discovery, STACK_MANIFEST env var)
        #[arg(short, long, env = "STACK_MANIFEST")]
        manifest: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// Parse and expand the manifest, printing a summary instead of the graph
    Validate {
        /// Manifest path (defaults to stack.kdl discovery, STACK_MANIFEST env var)
        #[arg(short, long, env = "STACK_MANIFEST")]
        manifest: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand { manifest, format } => commands::expand::handle(manifest, format),
        Commands::Validate { manifest } => commands::validate::handle(manifest),
        Commands::Version => {
            println!("stackform {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
