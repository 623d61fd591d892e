//! Filesystem conventions around a mod folder.
//!
//! A mod root holds the container files, usually a `data/` subfolder, and an
//! optional `hashed_files.json`. Character containers live under
//! `.../characters/<family>/skins/skin<N>.<ext>`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use propbin_model::ModelError;

use crate::OpsResult;

static FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/characters/([^/]+)/").expect("Invalid family regex")
});

static VARIANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/characters/([^/]+)/skins/skin(\d+)").expect("Invalid variant regex")
});

/// Family used when a path does not follow the character layout.
pub const UNKNOWN_FAMILY: &str = "unknown";

/// Parent of the nearest ancestor named `data` (any case), else the
/// directory holding `path`.
pub fn resolve_root(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or(Path::new("."));
    dir.ancestors()
        .find(|a| {
            a.file_name()
                .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case("data"))
        })
        .and_then(Path::parent)
        .unwrap_or(dir)
        .to_path_buf()
}

/// Regular files directly inside `dir` with extension `ext`, sorted by path.
pub fn containers_in(dir: &Path, ext: &str) -> OpsResult<Vec<PathBuf>> {
    let read = fs::read_dir(dir).map_err(|e| ModelError::io_with_path(e, dir))?;
    let mut out: Vec<PathBuf> = read
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, ext))
        .collect();
    out.sort();
    debug!("{} containers in {}", out.len(), dir.display());
    Ok(out)
}

/// Whether `path` ends in `.<ext>`, ignoring case.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

/// Whether a link string names a container with extension `ext`.
pub fn is_container_link(link: &str, ext: &str) -> bool {
    link.to_lowercase().ends_with(&format!(".{}", ext.to_lowercase()))
}

/// File stem as a string, empty when there is none.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Relative link under which the extraction output is registered:
/// `data/<stem>_vfx.<ext>`.
pub fn extraction_link(primary: &Path, ext: &str) -> String {
    format!("data/{}_vfx.{}", stem(primary), ext)
}

/// Where the extraction output for `primary` is written.
pub fn extraction_path(root: &Path, primary: &Path, ext: &str) -> PathBuf {
    root.join(extraction_link(primary, ext))
}

/// Stem suffix of the safety copy kept next to a rewritten container.
pub const BACKUP_SUFFIX: &str = "_backup";

/// `<dir>/<stem>_backup.<ext>` for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{}{BACKUP_SUFFIX}{ext}", stem(path)))
}

/// Whether `path` is a safety copy written by [`backup_path`]. Backups are
/// never transformation sources.
pub fn is_backup(path: &Path) -> bool {
    stem(path).to_lowercase().ends_with(BACKUP_SUFFIX)
}

/// `<dir>/skin<index>.<ext>`.
pub fn variant_path(dir: &Path, index: u32, ext: &str) -> PathBuf {
    dir.join(format!("skin{index}.{ext}"))
}

/// Path with forward slashes, for pattern matching.
fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lowercase family name from a `/characters/<family>/` segment.
pub fn family_of(path: &Path) -> Option<String> {
    FAMILY_RE
        .captures(&slashed(path))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Family and variant index from `/characters/<family>/skins/skin<N>`.
///
/// Falls back to `("unknown", 0)` when the path does not follow the layout.
pub fn detect_family(path: &Path) -> (String, u32) {
    VARIANT_RE
        .captures(&slashed(path))
        .and_then(|c| {
            let family = c.get(1)?.as_str().to_lowercase();
            let index = c.get(2)?.as_str().parse().ok()?;
            Some((family, index))
        })
        .unwrap_or_else(|| (UNKNOWN_FAMILY.to_string(), 0))
}

/// Whether two paths name the same file, tolerating paths that cannot be
/// canonicalized.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
