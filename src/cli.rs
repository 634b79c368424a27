use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Aeolus CESM hindcast assembly and drift-removal tools.
#[derive(Parser)]
#[command(
    name = "aeolus",
    version,
    about = "Assemble CESM hindcast ensembles and remove lead-dependent drift"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Discover hindcast files and report per-year ensemble coverage.
    Manifest(ManifestArgs),
    /// Assemble the hindcast ensemble, optionally drift-correct and write it.
    Assemble(AssembleArgs),
}

/// Arguments for the `manifest` subcommand.
#[derive(clap::Args)]
pub struct ManifestArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "aeolus.toml")]
    pub config: PathBuf,
}

/// Arguments for the `assemble` subcommand.
#[derive(clap::Args)]
pub struct AssembleArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "aeolus.toml")]
    pub config: PathBuf,

    /// Override output NetCDF path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Distribute per-year opens over a worker pool.
    #[arg(long)]
    pub parallel: bool,
}
