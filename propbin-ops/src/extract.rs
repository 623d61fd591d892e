//! Moving every entry of one type out of a set of containers into a new one.

use std::path::{Path, PathBuf};

use propbin_hash::NameResolver;
use propbin_model::{Container, Entry};
use tracing::{debug, info, warn};

use crate::dedup::{ConflictPolicy, IdentityIndex};
use crate::layout;
use crate::schema::{TypeMatcher, VFX_SYSTEM};
use crate::{OpsContext, OpsResult};

/// Removes the entries matching `matcher` from `container` and returns the
/// ones whose identity `seen` had not admitted yet.
///
/// Non-matching entries keep their order. Matches that repeat an identity
/// are dropped from the container without being returned, so the first
/// occurrence across a series of calls wins.
pub fn split_entries(
    container: &mut Container,
    matcher: &TypeMatcher,
    resolver: &NameResolver,
    seen: &mut IdentityIndex,
) -> OpsResult<Vec<Entry>> {
    let matched = container.take_entries(|e| matcher.matches(e, resolver));
    let mut out = Vec::with_capacity(matched.len());
    for entry in matched {
        if seen.admit(&entry)? {
            out.push(entry);
        }
    }
    Ok(out)
}

/// Result of an in-memory extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOutcome {
    /// New container holding every extracted entry, in source order.
    pub destination: Container,
    /// Entries removed from each source, indexed like the sources.
    pub removed: Vec<usize>,
}

impl ExtractOutcome {
    pub fn extracted(&self) -> usize {
        self.destination.len()
    }
}

/// Splits the matching entries out of `sources`, in order.
///
/// Every source that lost at least one entry gets `link` added to its link
/// list unless an equivalent link is already there.
pub fn extract(
    sources: &mut [Container],
    matcher: &TypeMatcher,
    resolver: &NameResolver,
    link: &str,
    policy: ConflictPolicy,
) -> OpsResult<ExtractOutcome> {
    let mut seen = IdentityIndex::new(policy);
    let mut entries = Vec::new();
    let mut removed = Vec::with_capacity(sources.len());

    for source in sources.iter_mut() {
        let before = source.len();
        entries.extend(split_entries(source, matcher, resolver, &mut seen)?);
        let lost = before - source.len();
        if lost > 0 && source.add_link(link) {
            debug!("Registered link {}", link);
        }
        removed.push(lost);
    }

    Ok(ExtractOutcome {
        destination: Container::with_entries(entries),
        removed,
    })
}

/// Files touched by [`Extractor::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractReport {
    /// Written output, `None` when nothing matched.
    pub destination: Option<PathBuf>,
    pub extracted: usize,
    /// Sources rewritten without their matching entries.
    pub changed: Vec<PathBuf>,
    /// Secondaries that could not be read.
    pub skipped: Vec<PathBuf>,
}

/// Extracts VFX systems from a primary container and its siblings into
/// `<root>/data/<stem>_vfx.<ext>`.
pub struct Extractor<'a> {
    ctx: OpsContext<'a>,
    matcher: TypeMatcher,
}

impl<'a> Extractor<'a> {
    pub fn new(ctx: OpsContext<'a>) -> Self {
        Self::with_matcher(ctx, TypeMatcher::new(VFX_SYSTEM))
    }

    pub fn with_matcher(ctx: OpsContext<'a>, matcher: TypeMatcher) -> Self {
        Self { ctx, matcher }
    }

    /// The primary first, then every container directly in the root, each
    /// path once. The extraction output and backups are never sources.
    fn sources(&self, primary: &Path, root: &Path, destination: &Path) -> OpsResult<Vec<PathBuf>> {
        let mut paths = vec![primary.to_path_buf()];
        for candidate in layout::containers_in(root, self.ctx.extension())? {
            if layout::is_backup(&candidate) {
                debug!("Skipping backup {}", candidate.display());
                continue;
            }
            if layout::same_file(&candidate, destination)
                || paths.iter().any(|p| layout::same_file(p, &candidate))
            {
                continue;
            }
            paths.push(candidate);
        }
        Ok(paths)
    }

    pub fn run(&self, primary: &Path) -> OpsResult<ExtractReport> {
        let ext = self.ctx.extension();
        let root = layout::resolve_root(primary);
        let destination = layout::extraction_path(&root, primary, ext);
        let link = layout::extraction_link(primary, ext);
        info!("Extracting from {} (root {})", primary.display(), root.display());

        let mut paths = Vec::new();
        let mut containers = Vec::new();
        let mut report = ExtractReport::default();

        for path in self.sources(primary, &root, &destination)? {
            match self.ctx.read(&path) {
                Ok(c) => {
                    paths.push(path);
                    containers.push(c);
                }
                Err(e) if paths.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push(path);
                }
            }
        }

        let outcome = extract(
            &mut containers,
            &self.matcher,
            self.ctx.resolver,
            &link,
            self.ctx.config.conflict_policy,
        )?;

        if outcome.removed.iter().all(|&n| n == 0) {
            info!("No matching entries in {} containers", containers.len());
            return Ok(report);
        }

        self.ctx.write(&outcome.destination, &destination)?;
        report.extracted = outcome.extracted();
        report.destination = Some(destination);

        for ((path, container), &lost) in paths.iter().zip(&containers).zip(&outcome.removed) {
            if lost == 0 {
                continue;
            }
            info!("Extracted {} entries from {}", lost, path.display());
            self.ctx.write(container, path)?;
            report.changed.push(path.clone());
        }

        info!("Created {} with {} entries", link, report.extracted);
        Ok(report)
    }
}
