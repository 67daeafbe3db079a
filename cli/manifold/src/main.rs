//! Manifold CLI — bind multi-target declarations and publish module graphs.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use manifest::ManifoldManifest;

#[derive(Parser)]
#[command(name = "manifold", version, about = "Cross-target declaration binding and publication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the manifest and dry-run declaration binding
    Check,
    /// Build per-target modules and the root module
    Build {
        /// Override the publication version
        #[arg(long)]
        version: Option<String>,
        /// Artifact output directory (default: outputs.dir from the manifest)
        #[arg(long)]
        out: Option<String>,
    },
    /// Aggregate all modules and write the publication descriptors
    Publish {
        /// Directory to write module descriptors into (default: publish/)
        #[arg(long)]
        out: Option<String>,
        /// Override the publication version
        #[arg(long)]
        version: Option<String>,
        /// Mark the publication as a snapshot (appends -SNAPSHOT)
        #[arg(long)]
        snapshot: bool,
        /// Build and validate without writing descriptors
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve a consumer request against the publication
    Resolve {
        /// Requested usage (compile, runtime)
        #[arg(long)]
        usage: Option<String>,
        /// Requested documentation kind (sources, docs)
        #[arg(long)]
        documentation: Option<String>,
        /// Consumer target name
        #[arg(long)]
        target: Option<String>,
    },
    /// Inspect the target matrix
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List targets with capabilities and parents
    List,
    /// Show the target tree
    Tree,
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, project_dir) = load_manifest(&cwd)?;

    match cli.command {
        Commands::Check => commands::check::run(&manifest),

        Commands::Build { version, out } => {
            commands::build::run(&manifest, version.as_deref(), out.as_deref())
        }

        Commands::Publish {
            out,
            version,
            snapshot,
            dry_run,
        } => commands::publish::run(
            &project_dir,
            &manifest,
            out.as_deref(),
            version.as_deref(),
            snapshot,
            dry_run,
        ),

        Commands::Resolve {
            usage,
            documentation,
            target,
        } => commands::resolve::run(
            &manifest,
            usage.as_deref(),
            documentation.as_deref(),
            target.as_deref(),
        ),

        Commands::Target { action } => match action {
            TargetAction::List => commands::target::list(&manifest),
            TargetAction::Tree => commands::target::tree(&manifest),
        },
    }
}

/// Load the manifest from the current directory upward.
fn load_manifest(cwd: &Path) -> anyhow::Result<(ManifoldManifest, PathBuf)> {
    match ManifoldManifest::find_and_load(cwd)? {
        Some(found) => Ok(found),
        None => anyhow::bail!(
            "no manifold.toml found in {} or any parent directory",
            cwd.display()
        ),
    }
}
