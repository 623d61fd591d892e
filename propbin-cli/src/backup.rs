//! Safety copies taken before a container is rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use propbin_ops::layout;
use tracing::info;

/// Where the copies of one file went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backups {
    /// Copy in the system temp directory, named after the process id.
    pub temp: PathBuf,
    /// `<stem>_backup.<ext>` next to the original.
    pub local: PathBuf,
}

fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// Copies `path` into `temp_dir` and next to itself.
pub fn create_in(path: &Path, temp_dir: &Path) -> Result<Backups> {
    let (stem, ext) = split_name(path);
    let temp = temp_dir.join(format!("{stem}_propbin_{}{ext}", std::process::id()));
    let local = layout::backup_path(path);

    fs::copy(path, &temp)
        .with_context(|| format!("Failed to copy {} to {}", path.display(), temp.display()))?;
    info!("Backup created in temp: {}", temp.display());
    fs::copy(path, &local)
        .with_context(|| format!("Failed to copy {} to {}", path.display(), local.display()))?;
    info!("Local backup created: {}", local.display());

    Ok(Backups { temp, local })
}

/// Copies `path` into the system temp directory and next to itself.
pub fn create(path: &Path) -> Result<Backups> {
    create_in(path, &std::env::temp_dir())
}
