//! propbin: structural edits on property containers.
//!
//! Usage:
//!   propbin extract data/characters/ahri/skins/skin0.bin
//!   propbin merge   data/characters/ahri/skins/skin0.bin
//!   propbin split   --backup skin0.bin
//!   propbin clone   --last 40 data/characters/ahri/skins/skin0.bin
//!   propbin prune   --hash-dir ~/hashes skin0.bin

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use propbin_cli::{Overrides, backup, load_resolver, log_filter};
use propbin_model::JsonCodec;
use propbin_ops::{CloneRewriter, Extractor, Merger, OpsContext, Pruner, ToolConfig, Wrapper};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "propbin")]
#[command(about = "Extract, merge, clone, and prune entries of property containers")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ~/.propbin/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding hash dictionaries
    #[arg(long, global = true)]
    hash_dir: Option<PathBuf>,

    /// Container file extension
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Copy the target file to the temp dir and to <stem>_backup first
    #[arg(short, long, global = true)]
    backup: bool,

    /// Fail when one identity appears with two different types
    #[arg(long, global = true)]
    reject_conflicts: bool,

    /// Write indented JSON
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable verbose debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move VFX systems of a container and its siblings into data/<stem>_vfx
    Extract { path: PathBuf },
    /// Wrap every VFX emitter into its own triggered system
    Split { path: PathBuf },
    /// Merge linked containers into this one and delete them
    Merge { path: PathBuf },
    /// Write renamed copies of a skin container for every variant index
    Clone {
        path: PathBuf,
        #[arg(long)]
        first: Option<u32>,
        #[arg(long)]
        last: Option<u32>,
    },
    /// Remove VFX systems the resource resolver does not reference
    Prune {
        path: PathBuf,
        /// Keep systems whose name is not in the dictionaries
        #[arg(long)]
        keep_unresolved: bool,
    },
}

impl Command {
    fn path(&self) -> &Path {
        match self {
            Self::Extract { path }
            | Self::Split { path }
            | Self::Merge { path }
            | Self::Clone { path, .. }
            | Self::Prune { path, .. } => path,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    FmtSubscriber::builder()
        .with_env_filter(log_filter(args.verbose))
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => ToolConfig::load_from(path),
        None => ToolConfig::load(),
    };
    let (first_variant, last_variant) = match &args.command {
        Command::Clone { first, last, .. } => (*first, *last),
        _ => (None, None),
    };
    Overrides {
        hash_dir: args.hash_dir.clone(),
        extension: args.extension.clone(),
        first_variant,
        last_variant,
        reject_conflicts: args.reject_conflicts,
        keep_unresolved: matches!(args.command, Command::Prune { keep_unresolved: true, .. }),
    }
    .apply(&mut config);

    let resolver = load_resolver(&config)?;
    let codec = JsonCodec { pretty: args.pretty };
    let ctx = OpsContext::new(&codec, &resolver, &config);

    let path = std::path::absolute(args.command.path())
        .with_context(|| format!("Invalid path {}", args.command.path().display()))?;
    if !path.is_file() {
        anyhow::bail!("{} is not a file", path.display());
    }
    if args.backup {
        backup::create(&path)?;
    }

    match &args.command {
        Command::Extract { .. } => {
            let report = Extractor::new(ctx)
                .run(&path)
                .context("Extraction failed")?;
            match &report.destination {
                Some(dest) => info!(
                    "Extracted {} entries into {} ({} sources changed)",
                    report.extracted,
                    dest.display(),
                    report.changed.len()
                ),
                None => info!("Nothing to extract"),
            }
        }
        Command::Split { .. } => {
            let report = Wrapper::new(ctx).run(&path).context("Split failed")?;
            info!(
                "Split {} emitters from {} systems",
                report.emitters, report.systems
            );
        }
        Command::Merge { .. } => {
            let report = Merger::new(ctx).run(&path).context("Merge failed")?;
            info!(
                "Merged {} entries from {} files",
                report.merged_entries,
                report.merged_files.len()
            );
        }
        Command::Clone { .. } => {
            let report = CloneRewriter::new(ctx).run(&path).context("Clone failed")?;
            info!(
                "Wrote {} variants, {} protected",
                report.written.len(),
                report.protected.len()
            );
        }
        Command::Prune { .. } => {
            let report = Pruner::new(ctx).run(&path).context("Prune failed")?;
            info!(
                "Removed {} of {} systems ({} unresolved)",
                report.removed, report.candidates, report.unresolved
            );
        }
    }

    Ok(())
}
