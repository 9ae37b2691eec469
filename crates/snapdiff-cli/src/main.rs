//! snapdiff CLI
//!
//! Command-line interface for diffing storage service snapshots

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "snapdiff")]
#[command(about = "snapdiff - list what changed between two storage snapshots", long_about = None)]
#[command(
    disable_help_flag = true,
    disable_help_subcommand = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Without a subcommand, run a diff
    #[command(flatten)]
    diff: commands::diff::DiffArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff a path between two snapshots
    #[command(disable_help_flag = true)]
    Diff(commands::diff::DiffArgs),
    /// List the snapshots known to the service
    #[command(disable_help_flag = true)]
    Snapshots(commands::snapshots::SnapshotsArgs),
    /// List every entry below a path in one snapshot
    #[command(disable_help_flag = true)]
    Tree(commands::tree::TreeArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Diff(args)) => commands::diff::execute(args),
        Some(Commands::Snapshots(args)) => commands::snapshots::execute(args),
        Some(Commands::Tree(args)) => commands::tree::execute(args),
        None => commands::diff::execute(cli.diff),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
