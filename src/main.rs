// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use galley::bundle::manifest;
use galley::{InstallPlan, Overrides, Recipe};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author, version, about = "Container recipe generator for packaged service bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Containerfile for a bundle directory
    Render {
        /// Bundle directory containing bundle.toml
        bundle_dir: PathBuf,

        /// Output path; '-' writes to stdout
        #[arg(short, long, default_value = "Containerfile")]
        output: String,
    },
    /// Show the resolved context and install plan for a bundle
    Inspect {
        /// Bundle directory containing bundle.toml
        bundle_dir: PathBuf,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List pipeline sections in render order
    Sections,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render { bundle_dir, output }) => {
            info!("Rendering recipe for bundle at: {}", bundle_dir.display());
            let spec = manifest::load_dir(&bundle_dir)?;
            let recipe = Recipe::default_pipeline();
            let rendered = recipe.render(&spec, &Overrides::new())?;
            if output == "-" {
                print!("{}", rendered);
            } else {
                std::fs::write(&output, &rendered)?;
                println!("Wrote {}", output);
            }
            Ok(())
        }
        Some(Commands::Inspect { bundle_dir, json }) => {
            let spec = manifest::load_dir(&bundle_dir)?;
            let context = spec.bind()?;
            let plan = InstallPlan::for_bundle(&context);

            if json {
                let doc = serde_json::json!({
                    "context": context,
                    "plan": plan,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("Bundle: {} version {}", context.name, context.version);
                println!("  Base image: {}", context.base_image);
                println!("  Architectures: {}", context.architectures.join(", "));
                println!("  User: {} (uid/gid {})", context.user, context.uid);
                println!("  Bundle root: {}", context.bundle_root);
                println!("  Package manager: {}", context.package_manager);
                println!("  Runtime version: {}", context.runtime_version);
                println!("  Entrypoint: {}", context.entrypoint);
                println!("  Port: {}", context.port);
                match plan.selected() {
                    Some(manifest) => println!("  Dependency manifest: {}", manifest),
                    None => println!("  Dependency manifest: none (install step omitted)"),
                }
            }
            Ok(())
        }
        Some(Commands::Sections) => {
            let recipe = Recipe::default_pipeline();
            for name in recipe.section_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "galley", &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Galley v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'galley --help' for usage information");
            Ok(())
        }
    }
}
