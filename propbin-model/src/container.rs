//! Containers: ordered entries plus links to other containers.

use std::collections::{HashMap, HashSet};

use propbin_hash::{Hash, normalize_path};
use serde::{Deserialize, Serialize};

use crate::{Entry, Value};

/// Signature of a regular (non-patch) container.
pub const PROP_SIGNATURE: &str = "PROP";
/// Version written for newly assembled containers.
pub const DEFAULT_VERSION: u32 = 3;

/// A patch record carried by patch containers. Kept opaque: no
/// transformation here interprets patches, they are preserved as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub target: Hash,
    pub path: String,
    pub value: Value,
}

/// A container file's contents.
///
/// Entry identities are expected to be unique. Duplicates are tolerated
/// (see [`Container::duplicate_identities`]) and lookups return the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub signature: String,
    pub version: u32,
    pub is_patch: bool,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// An empty regular container.
    #[must_use]
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// A regular container holding `entries` and no links.
    #[must_use]
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            signature: PROP_SIGNATURE.to_string(),
            version: DEFAULT_VERSION,
            is_patch: false,
            links: Vec::new(),
            entries,
            patches: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set of canonical identity hashes.
    #[must_use]
    pub fn identity_set(&self) -> HashSet<Hash> {
        self.entries.iter().map(Entry::id).collect()
    }

    /// Identities that occur more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_identities(&self) -> Vec<Hash> {
        let mut counts: HashMap<Hash, usize> = HashMap::new();
        let mut order = Vec::new();
        for entry in &self.entries {
            let count = counts.entry(entry.id()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(entry.id());
            }
        }
        order
    }

    /// First entry with the given identity.
    #[must_use]
    pub fn find(&self, id: Hash) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn find_mut(&mut self, id: Hash) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// Index of the last entry whose type is `type_hash`.
    #[must_use]
    pub fn last_of_type(&self, type_hash: Hash) -> Option<usize> {
        self.entries.iter().rposition(|e| e.type_hash() == type_hash)
    }

    /// Whether an equivalent link (ignoring case and separator style) exists.
    #[must_use]
    pub fn has_link(&self, link: &str) -> bool {
        let wanted = normalize_path(link);
        self.links.iter().any(|l| normalize_path(l) == wanted)
    }

    /// Appends `link` unless an equivalent one exists. Returns whether it was added.
    pub fn add_link(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.has_link(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Removes entries for which `remove` returns true, returning them in order.
    pub fn take_entries(&mut self, mut remove: impl FnMut(&Entry) -> bool) -> Vec<Entry> {
        let (taken, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| remove(e));
        self.entries = kept;
        taken
    }
}
