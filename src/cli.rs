use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirsnap")]
#[command(about = "Snapshot a directory tree's metadata and report what changed between snapshots")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug output on stderr
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save the state of a directory tree as a JSON snapshot file
    Snap(SnapArgs),

    /// Compare two snapshot files and report the changes
    Diff(DiffArgs),
}

#[derive(Parser)]
pub struct SnapArgs {
    /// Directory to snapshot
    pub path: PathBuf,

    /// Snapshot file name (defaults to the current time, e.g. 20240301T101500.json)
    #[arg(long, short = 'f')]
    pub filename: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Earlier snapshot created with the snap command
    pub snap1: PathBuf,

    /// Later snapshot created with the snap command
    pub snap2: PathBuf,
}
