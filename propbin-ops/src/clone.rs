//! Writing parallel skin variants of one properties container.
//!
//! Each variant is the source container with the properties entry, its
//! resource resolver, and the link between them renamed for the variant
//! index. Everything else is shared verbatim.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use propbin_hash::NameResolver;
use propbin_model::{Container, FieldSet, Key, Value};
use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::layout;
use crate::schema::{RESOURCE_RESOLVER, SKIN_PROPERTIES, TypeMatcher, fields};
use crate::{OpsContext, OpsError, OpsResult};

static SKIN_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(skin)(\d+)").expect("Invalid skin segment regex"));

/// Identity of the properties entry of variant `index`.
pub fn variant_identity(family: &str, index: u32) -> String {
    format!("characters/{family}/skins/skin{index}")
}

/// Resolver link for variant `index` when the source carries no usable one.
pub fn default_resolver_link(family: &str, index: u32) -> String {
    format!("Characters/{family}/Skins/Skin{index}/Resources")
}

/// Renames the variant-specific parts of a container in place and puts
/// them back afterwards.
#[derive(Debug, Clone)]
pub struct VariantRewriter {
    family: String,
    target: usize,
    companion: Option<usize>,
    original_target: Key,
    original_companion: Option<Key>,
    original_link: Option<Value>,
}

impl VariantRewriter {
    /// Finds the last properties entry and the last resolver entry.
    /// `None` when there is no properties entry.
    pub fn locate(container: &Container, resolver: &NameResolver, family: &str) -> Option<Self> {
        let last_matching = |m: TypeMatcher| {
            container
                .entries
                .iter()
                .rposition(|e| m.matches(e, resolver))
        };
        let target = last_matching(TypeMatcher::new(SKIN_PROPERTIES))?;
        let companion = last_matching(TypeMatcher::new(RESOURCE_RESOLVER));

        let original_link = companion
            .and_then(|_| container.entries[target].value(fields::RESOURCE_RESOLVER))
            .cloned();

        Some(Self {
            family: family.to_lowercase(),
            target,
            companion,
            original_target: container.entries[target].identity.clone(),
            original_companion: companion.map(|i| container.entries[i].identity.clone()),
            original_link,
        })
    }

    pub fn has_companion(&self) -> bool {
        self.companion.is_some()
    }

    /// Resolver link for variant `index`: the source link with its
    /// `Skin<N>` segment renumbered, or the default layout.
    pub fn companion_link(&self, index: u32) -> String {
        let existing = match &self.original_link {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Link(Key::Name(s))) => Some(s.as_str()),
            _ => None,
        };
        match existing {
            Some(s) if SKIN_SEGMENT_RE.is_match(s) => SKIN_SEGMENT_RE
                .replace(s, |c: &regex_lite::Captures<'_>| format!("{}{index}", &c[1]))
                .into_owned(),
            _ => default_resolver_link(&self.family, index),
        }
    }

    /// Rewrites `container` as variant `index`.
    pub fn apply(&self, container: &mut Container, index: u32) {
        container.entries[self.target].identity =
            Key::hashed(&variant_identity(&self.family, index));

        let Some(companion) = self.companion else {
            return;
        };
        let link = self.companion_link(index);
        container.entries[companion].identity = Key::hashed(&link);

        if let Some(field) = container.entries[self.target].field_mut(fields::RESOURCE_RESOLVER) {
            field.value = match field.value {
                Value::String(_) => Value::String(link),
                _ => Value::Link(Key::Name(link)),
            };
        }
    }

    /// Puts back every identity and payload [`apply`](Self::apply) changed.
    pub fn restore(&self, container: &mut Container) {
        container.entries[self.target].identity = self.original_target.clone();
        if let (Some(i), Some(key)) = (self.companion, &self.original_companion) {
            container.entries[i].identity = key.clone();
        }
        if let Some(original) = &self.original_link {
            if let Some(field) = container.entries[self.target].field_mut(fields::RESOURCE_RESOLVER) {
                field.value = original.clone();
            }
        }
    }
}

/// Variants written and skipped by one clone pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub family: String,
    pub source_index: u32,
    pub written: Vec<u32>,
    /// Existing variants left alone because their size differs from the source.
    pub protected: Vec<u32>,
}

/// Clones a `skin<N>` container into every other variant index.
pub struct CloneRewriter<'a> {
    ctx: OpsContext<'a>,
}

impl<'a> CloneRewriter<'a> {
    pub fn new(ctx: OpsContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn run(&self, source: &Path) -> OpsResult<CloneReport> {
        let mut container = self.ctx.read(source)?;
        self.run_on(&mut container, source)
    }

    /// Writes the variants of an already loaded `container` read from
    /// `source`, leaving `container` as it was.
    pub fn run_on(&self, container: &mut Container, source: &Path) -> OpsResult<CloneReport> {
        let variants = self.ctx.config.variants();
        if variants.is_empty() {
            return Err(OpsError::InvalidInput(format!(
                "empty variant range {}..={}",
                variants.start(),
                variants.end()
            )));
        }
        let (family, source_index) = layout::detect_family(source);
        if family == layout::UNKNOWN_FAMILY {
            warn!("{} is not under characters/<name>/skins/", source.display());
        }

        let rewriter = VariantRewriter::locate(container, self.ctx.resolver, &family).ok_or_else(
            || OpsError::MissingEntry {
                schema: SKIN_PROPERTIES.to_string(),
                path: source.to_path_buf(),
            },
        )?;
        if !rewriter.has_companion() {
            info!("No {} entry, only the properties entry is renamed", RESOURCE_RESOLVER);
        }

        let source_size = fs::metadata(source)
            .map_err(|e| propbin_model::ModelError::io_with_path(e, source))?
            .len();
        let dir = source.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut report = CloneReport {
            family,
            source_index,
            ..CloneReport::default()
        };
        let result = self.write_variants(container, &rewriter, &dir, source_size, &mut report);
        rewriter.restore(container);
        result?;

        info!(
            "Wrote {} variants of {} skin {} ({} protected)",
            report.written.len(),
            report.family,
            report.source_index,
            report.protected.len()
        );
        Ok(report)
    }

    fn write_variants(
        &self,
        container: &mut Container,
        rewriter: &VariantRewriter,
        dir: &Path,
        source_size: u64,
        report: &mut CloneReport,
    ) -> OpsResult<()> {
        let ext = self.ctx.extension();
        for index in self.ctx.config.variants() {
            if index == report.source_index {
                continue;
            }
            let dest = layout::variant_path(dir, index, ext);
            if let Ok(meta) = fs::metadata(&dest) {
                if meta.len() != source_size {
                    debug!(
                        "Skipping {}: {} bytes, source has {}",
                        dest.display(),
                        meta.len(),
                        source_size
                    );
                    report.protected.push(index);
                    continue;
                }
            }
            rewriter.apply(container, index);
            self.ctx.write(container, &dest)?;
            report.written.push(index);
        }
        Ok(())
    }
}
