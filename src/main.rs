use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use dirsnap::cli::{Cli, Command, DiffArgs, SnapArgs};
use dirsnap::config::Config;
use dirsnap::report;
use dirsnap::scan::{self, RootDir};
use dirsnap::store::{self, diff::{self, ChangeKind}};
use dirsnap::{logging, Result};
use tracing::debug;

fn snap(args: &SnapArgs, config: &Config) -> Result<()> {
    let root = RootDir::resolve(&args.path)?;
    let taken_at = Local::now().fixed_offset();
    let result = scan::build_at(&root, taken_at)?;

    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| store::default_filename(&taken_at));
    let target = config.output_path(&filename);

    store::save(&result.snapshot, &target)?;

    if !result.skipped.is_empty() {
        debug!(skipped = result.skipped.len(), "some entries were left out");
    }
    debug!("snap took {:.2}s", result.duration_ms as f64 / 1000.0);

    print!("{}", report::render_saved(&target));
    Ok(())
}

fn compare(args: &DiffArgs) -> Result<()> {
    let from = store::load(&args.snap1)?;
    let to = store::load(&args.snap2)?;

    let result = diff::diff(&from, &to)?;
    debug!(
        added = result.count(ChangeKind::Added),
        changed = result.count(ChangeKind::Changed),
        removed = result.count(ChangeKind::Removed),
        "diff complete"
    );

    print!("{}", report::render_diff(&result));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.verbose);

    let outcome = match &cli.command {
        Command::Snap(args) => snap(args, &config),
        Command::Diff(args) => compare(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
