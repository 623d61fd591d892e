//! Support code for the `propbin` binary.

pub mod backup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use propbin_hash::NameResolver;
use propbin_ops::{ConflictPolicy, ToolConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub hash_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub first_variant: Option<u32>,
    pub last_variant: Option<u32>,
    pub reject_conflicts: bool,
    pub keep_unresolved: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut ToolConfig) {
        if let Some(dir) = &self.hash_dir {
            config.hash_dir = Some(dir.clone());
        }
        if let Some(ext) = &self.extension {
            config.extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(n) = self.first_variant {
            config.first_variant = n;
        }
        if let Some(n) = self.last_variant {
            config.last_variant = n;
        }
        if self.reject_conflicts {
            config.conflict_policy = ConflictPolicy::Reject;
        }
        if self.keep_unresolved {
            config.remove_unresolved = false;
        }
    }
}

/// Loads the configured dictionaries, or an empty resolver when no hash
/// directory is configured.
pub fn load_resolver(config: &ToolConfig) -> Result<NameResolver> {
    let Some(dir) = &config.hash_dir else {
        info!("No hash directory configured, names will show as hashes");
        return Ok(NameResolver::empty());
    };
    NameResolver::from_dir(dir, &config.dictionary_names())
        .with_context(|| format!("Failed to load hash dictionaries from {}", dir.display()))
}

/// Log filter: `--verbose` forces debug, else `RUST_LOG`, else info.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
