//! Folding linked containers back into the container that links them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use propbin_hash::{PathHash, normalize_path};
use propbin_model::Container;
use tracing::{debug, info, warn};

use crate::dedup::IdentityIndex;
use crate::layout;
use crate::{OpsContext, OpsResult};

/// Name of the side-file mapping hashed filenames to their logical paths.
pub const HASHED_FILES: &str = "hashed_files.json";

/// Reverse index of `hashed_files.json`: logical path to hashed filename.
#[derive(Debug, Clone, Default)]
pub struct HashedFileIndex {
    by_path: HashMap<String, String>,
}

impl HashedFileIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the side-file's JSON object of `"<hash>.<ext>": "<path>"`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let by_path = raw
            .into_iter()
            .map(|(hashed, path)| (normalize_path(&path), hashed.to_lowercase()))
            .collect();
        Ok(Self { by_path })
    }

    /// Loads `<root>/hashed_files.json`. Absent or malformed files give an
    /// empty index.
    pub fn load(root: &Path) -> Self {
        let path = root.join(HASHED_FILES);
        if !path.exists() {
            debug!("No {} in {}", HASHED_FILES, root.display());
            return Self::empty();
        }
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(index) => {
                    info!("Loaded {} hashed file names from {:?}", index.len(), path);
                    index
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    Self::empty()
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                Self::empty()
            }
        }
    }

    /// Hashed filename recorded for a logical path.
    pub fn lookup(&self, link: &str) -> Option<&str> {
        self.by_path.get(&normalize_path(link)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// How a link was matched to a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Link's file name directly under the root.
    Name,
    /// Link's relative path under the root.
    Path,
    /// Hashed filename recorded in the side-file.
    HashLookup,
    /// Hashed filename computed from the link.
    HashComputed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::HashLookup => "hash-lookup",
            Self::HashComputed => "hash-computed",
        })
    }
}

/// Paths where the container named by `link` may live, in priority order.
/// The computed hash is only tried when the side-file has no record.
pub fn link_candidates(
    link: &str,
    root: &Path,
    index: &HashedFileIndex,
    ext: &str,
) -> Vec<(PathBuf, Strategy)> {
    let slashed = link.replace('\\', "/");
    let file_name = slashed.rsplit('/').next().unwrap_or(&slashed);

    let mut out = vec![
        (root.join(file_name), Strategy::Name),
        (root.join(&slashed), Strategy::Path),
    ];
    match index.lookup(link) {
        Some(hashed) => out.push((root.join(hashed), Strategy::HashLookup)),
        None => out.push((
            root.join(format!("{}.{}", PathHash::of(link).to_hex(), ext)),
            Strategy::HashComputed,
        )),
    }
    out
}

/// Appends every entry of `secondary` whose identity `seen` has not
/// admitted, in file order. Returns how many were appended.
pub fn merge_entries(
    primary: &mut Container,
    secondary: Container,
    seen: &mut IdentityIndex,
) -> OpsResult<usize> {
    let mut merged = 0;
    for entry in secondary.entries {
        if seen.admit(&entry)? {
            primary.entries.push(entry);
            merged += 1;
        }
    }
    Ok(merged)
}

/// Link list after a merge: links whose container was merged are dropped,
/// except the family base container and links to non-container files.
pub fn retain_links(
    links: &[String],
    merged: &HashSet<String>,
    family: Option<&str>,
    ext: &str,
) -> Vec<String> {
    let base = family.map(|f| format!("{}.{}", f.to_lowercase(), ext.to_lowercase()));
    links
        .iter()
        .filter(|link| {
            if !merged.contains(*link) {
                return true;
            }
            let is_base = base
                .as_deref()
                .is_some_and(|b| link.to_lowercase().contains(b));
            is_base || !layout::is_container_link(link, ext)
        })
        .cloned()
        .collect()
}

/// Outcome of [`Merger::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub merged_entries: usize,
    /// Secondaries that contributed entries; they are deleted after the write.
    pub merged_files: Vec<PathBuf>,
    pub links_removed: usize,
    /// Container links that matched no file.
    pub unresolved_links: Vec<String>,
}

/// Merges the containers a primary links to into the primary.
pub struct Merger<'a> {
    ctx: OpsContext<'a>,
}

impl<'a> Merger<'a> {
    pub fn new(ctx: OpsContext<'a>) -> Self {
        Self { ctx }
    }

    fn is_family_base(&self, path: &Path, family: Option<&str>) -> bool {
        let Some(family) = family else {
            return false;
        };
        let base = format!("{}.{}", family, self.ctx.extension());
        path.file_name()
            .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(&base))
    }

    /// Secondaries to merge, each with the link that named it, in link order.
    fn resolve_secondaries(
        &self,
        primary_path: &Path,
        primary: &Container,
        family: Option<&str>,
        report: &mut MergeReport,
    ) -> Vec<(PathBuf, String)> {
        let ext = self.ctx.extension();
        let root = layout::resolve_root(primary_path);
        let index = HashedFileIndex::load(&root);
        let mut queued: Vec<(PathBuf, String)> = Vec::new();

        for link in &primary.links {
            if !layout::is_container_link(link, ext) {
                continue;
            }
            let found = link_candidates(link, &root, &index, ext)
                .into_iter()
                .find(|(p, _)| p.is_file());

            let Some((path, strategy)) = found else {
                debug!("Link {} not found", link);
                report.unresolved_links.push(link.clone());
                continue;
            };
            if layout::same_file(&path, primary_path)
                || self.is_family_base(&path, family)
                || queued.iter().any(|(q, _)| layout::same_file(q, &path))
            {
                debug!("Link {} resolves to {}, not merged", link, path.display());
                continue;
            }
            debug!("Link {} found via {}: {}", link, strategy, path.display());
            queued.push((path, link.clone()));
        }
        queued
    }

    pub fn run(&self, primary_path: &Path) -> OpsResult<MergeReport> {
        let mut primary = self.ctx.read(primary_path)?;
        let family = layout::family_of(primary_path);
        let mut report = MergeReport::default();
        info!(
            "Merging into {} ({} links)",
            primary_path.display(),
            primary.links.len()
        );

        let secondaries =
            self.resolve_secondaries(primary_path, &primary, family.as_deref(), &mut report);
        let mut seen = IdentityIndex::seeded(self.ctx.config.conflict_policy, &primary.entries);
        let mut merged_links = HashSet::new();

        for (path, link) in secondaries {
            let secondary = match self.ctx.read(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let merged = merge_entries(&mut primary, secondary, &mut seen)?;
            if merged == 0 {
                debug!("Nothing new in {}", path.display());
                continue;
            }
            info!("Merged {} entries from {}", merged, path.display());
            report.merged_entries += merged;
            report.merged_files.push(path);
            merged_links.insert(link);
        }

        if report.merged_files.is_empty() {
            info!("No new entries to merge into {}", primary_path.display());
            return Ok(report);
        }

        let before = primary.links.len();
        primary.links = retain_links(
            &primary.links,
            &merged_links,
            family.as_deref(),
            self.ctx.extension(),
        );
        report.links_removed = before - primary.links.len();

        self.ctx.write(&primary, primary_path)?;

        for path in &report.merged_files {
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to delete {}: {}", path.display(), e);
            }
        }

        info!(
            "Combined {} files into {}",
            report.merged_files.len(),
            primary_path.display()
        );
        Ok(report)
    }
}
