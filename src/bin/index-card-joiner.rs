//! Index Card Joiner CLI tool
//!
//! Merges every folder of index-card page PDFs in the newest project folder
//! and copies the merged files to a collection folder. Run without arguments
//! to use the shared drive defaults.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use index_card_joiner::config::{
    expand_home, DEFAULT_EXTENSION, DEFAULT_PREFIX, DEFAULT_ROOT, DEFAULT_SECONDARY_TARGET,
};
use index_card_joiner::{FolderOutcome, Joiner, JoinerConfig};

/// Index Card Joiner - Merge folders of index-card page PDFs
#[derive(Parser)]
#[command(name = "index-card-joiner")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge everything in the newest UNQ project on the shared drive
    index-card-joiner

    # Show what would be merged without writing anything
    index-card-joiner --dry-run -v

    # Rebuild every output of one specific project
    index-card-joiner --project \"~/Cards/UNQ0203 Web\" --force")]
struct Cli {
    /// Folder holding the project folders
    #[arg(long, env = "INDEX_JOINER_ROOT", default_value = DEFAULT_ROOT)]
    root: String,

    /// Use this project folder instead of the newest one under --root
    #[arg(long, env = "INDEX_JOINER_PROJECT")]
    project: Option<String>,

    /// Project folder prefix; the identifier is this prefix plus digits
    #[arg(long, env = "INDEX_JOINER_PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Folder receiving copies of merged outputs, one subfolder per project
    #[arg(long, env = "INDEX_JOINER_SECONDARY_TARGET", default_value = DEFAULT_SECONDARY_TARGET)]
    secondary_target: String,

    /// Skip files and folders whose names contain this text (repeatable)
    ///
    /// Replaces the default masks OLD and DNU when given.
    #[arg(long = "ignore", value_name = "TEXT")]
    ignore_masks: Vec<String>,

    /// Source file extension
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Rebuild outputs even when they are newer than their sources
    #[arg(long)]
    force: bool,

    /// Report what would be merged without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn to_config(&self) -> Result<JoinerConfig> {
        let mut config = JoinerConfig::new(
            expand_home(&self.root)?,
            expand_home(&self.secondary_target)?,
        );
        config.project = self.project.as_deref().map(expand_home).transpose()?;
        config.prefix = self.prefix.clone();
        config.extension = self.extension.clone();
        if !self.ignore_masks.is_empty() {
            config.ignore_masks = self.ignore_masks.clone();
        }
        config.force = self.force;
        config.dry_run = self.dry_run;
        Ok(config)
    }

    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every folder was processed successfully
fn run(cli: &Cli) -> Result<bool> {
    let config = cli.to_config().context("Invalid configuration")?;
    let dry_run = config.dry_run;
    let summary = Joiner::new(config).run().context("Join run failed")?;

    for report in &summary.reports {
        match &report.outcome {
            FolderOutcome::Merged { output, pages, .. } => {
                println!("Merged {} ({} pages)", output.display(), pages);
            }
            FolderOutcome::WouldMerge { output, pages, ordering, .. } => {
                println!("Would merge {} ({} pages, {} order)", output.display(), pages, ordering);
            }
            FolderOutcome::Copied { copy, .. } => {
                println!("Copied {}", copy.display());
            }
            FolderOutcome::WouldCopy { copy, .. } => {
                println!("Would copy {}", copy.display());
            }
            FolderOutcome::UpToDate { .. } | FolderOutcome::SelfReferential => {}
        }
    }
    for failure in &summary.failures {
        eprintln!("Failed: {}: {}", failure.folder.display(), failure.error);
    }

    let (merged, copied) = if dry_run {
        ("to merge", "to copy")
    } else {
        ("merged", "copied")
    };
    println!(
        "{}: {} {}, {} {}, {} up to date, {} failed",
        summary.project.name,
        summary.merged_count(),
        merged,
        summary.copied_count(),
        copied,
        summary.up_to_date_count(),
        summary.failures.len()
    );

    Ok(summary.is_success())
}
