//! Dropping VFX systems that the container's resource resolver no longer
//! references.

use std::collections::HashSet;
use std::path::Path;

use propbin_hash::{NameResolver, normalize_path};
use propbin_model::{Container, Entry, Key, Value};
use tracing::{debug, info, warn};

use crate::schema::{KNOWN_RESOLVER_TYPES, RESOURCE_RESOLVER, TypeMatcher, VFX_SYSTEM};
use crate::{OpsContext, OpsResult};

/// Whether candidates whose identity cannot be named are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunePolicy {
    pub remove_unresolved: bool,
}

impl Default for PrunePolicy {
    fn default() -> Self {
        Self {
            remove_unresolved: true,
        }
    }
}

/// Counts from one prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub resolver_found: bool,
    pub map_found: bool,
    /// Distinct live paths in the resolver map.
    pub live: usize,
    pub candidates: usize,
    pub kept: usize,
    pub removed: usize,
    /// Candidates whose identity has no known name.
    pub unresolved: usize,
}

/// The entry holding the resolver map: first one with a known resolver
/// type, else first one whose type name contains `ResourceResolver`.
pub fn find_resolver<'c>(container: &'c Container, resolver: &NameResolver) -> Option<&'c Entry> {
    let matcher = TypeMatcher::new(RESOURCE_RESOLVER).with_types(&KNOWN_RESOLVER_TYPES);
    container
        .entries
        .iter()
        .find(|e| matcher.matches_hash(e.type_hash()))
        .or_else(|| container.entries.iter().find(|e| matcher.matches(e, resolver)))
}

fn live_path(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) | Value::Link(Key::Name(s)) | Value::Hash(Key::Name(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Normalized string values of the entry's first map field. `None` when the
/// entry has no map field.
pub fn live_set(entry: &Entry) -> Option<HashSet<String>> {
    entry.fields.iter().find_map(|f| match &f.value {
        Value::Map { entries, .. } => Some(
            entries
                .iter()
                .filter_map(|(_, v)| live_path(v))
                .map(normalize_path)
                .collect(),
        ),
        _ => None,
    })
}

/// Removes every VFX system whose resolved identity is not in the live set.
/// Without a resolver entry or map nothing is removed.
pub fn prune(container: &mut Container, resolver: &NameResolver, policy: PrunePolicy) -> PruneReport {
    let mut report = PruneReport::default();

    let Some(holder) = find_resolver(container, resolver) else {
        info!("No {} entry, nothing to prune", RESOURCE_RESOLVER);
        return report;
    };
    report.resolver_found = true;
    debug!("Resolver entry {}", holder.identity.display(resolver));

    let Some(live) = live_set(holder) else {
        info!("{} has no map field, nothing to prune", RESOURCE_RESOLVER);
        return report;
    };
    report.map_found = true;
    report.live = live.len();

    let matcher = TypeMatcher::new(VFX_SYSTEM);
    let removed = container.take_entries(|e| {
        if !matcher.matches(e, resolver) {
            return false;
        }
        report.candidates += 1;
        match e.identity.resolve(resolver) {
            Some(name) if live.contains(&normalize_path(name)) => {
                report.kept += 1;
                false
            }
            Some(name) => {
                debug!("Unreferenced system {}", name);
                true
            }
            None => {
                debug!("Unresolved system {}", e.id());
                report.unresolved += 1;
                if !policy.remove_unresolved {
                    report.kept += 1;
                }
                policy.remove_unresolved
            }
        }
    });
    report.removed = removed.len();
    report
}

/// Prunes one container file in place.
pub struct Pruner<'a> {
    ctx: OpsContext<'a>,
}

impl<'a> Pruner<'a> {
    pub fn new(ctx: OpsContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn policy(&self) -> PrunePolicy {
        let mut policy = PrunePolicy {
            remove_unresolved: self.ctx.config.remove_unresolved,
        };
        if policy.remove_unresolved && self.ctx.resolver.is_empty() {
            warn!("No hash dictionary loaded; systems without a name are kept");
            policy.remove_unresolved = false;
        }
        policy
    }

    pub fn run(&self, path: &Path) -> OpsResult<PruneReport> {
        let mut container = self.ctx.read(path)?;
        let report = prune(&mut container, self.ctx.resolver, self.policy());

        if report.removed == 0 {
            info!("No unused systems in {}", path.display());
            return Ok(report);
        }

        self.ctx.write(&container, path)?;
        info!(
            "Removed {} unused systems from {} (kept {}/{})",
            report.removed,
            path.display(),
            report.kept,
            report.candidates
        );
        Ok(report)
    }
}
