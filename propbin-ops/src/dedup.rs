//! Running identity sets shared across the containers of one pass.

use std::collections::HashMap;

use propbin_hash::Hash;
use propbin_model::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{OpsError, OpsResult};

/// What to do with an incoming entry whose identity is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// The first occurrence wins and later ones are dropped.
    #[default]
    KeepFirst,
    /// Same as `KeepFirst` when the types agree; a differing type is an
    /// [`OpsError::IdentityConflict`].
    Reject,
}

/// Identities admitted so far, with the type each was first seen as.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    seen: HashMap<Hash, Hash>,
    policy: ConflictPolicy,
}

impl IdentityIndex {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            seen: HashMap::new(),
            policy,
        }
    }

    /// Index pre-populated with every entry of `entries`, first one winning.
    pub fn seeded<'a>(policy: ConflictPolicy, entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut index = Self::new(policy);
        for entry in entries {
            index.seen.entry(entry.id()).or_insert_with(|| entry.type_hash());
        }
        index
    }

    /// Records `entry` if its identity is new. Returns whether it was admitted.
    pub fn admit(&mut self, entry: &Entry) -> OpsResult<bool> {
        let id = entry.id();
        let incoming = entry.type_hash();
        match self.seen.get(&id) {
            None => {
                self.seen.insert(id, incoming);
                Ok(true)
            }
            Some(&existing) if existing != incoming && self.policy == ConflictPolicy::Reject => {
                Err(OpsError::IdentityConflict {
                    identity: id,
                    existing,
                    incoming,
                })
            }
            Some(_) => {
                debug!("Duplicate identity {} dropped", id);
                Ok(false)
            }
        }
    }

    pub fn contains(&self, id: Hash) -> bool {
        self.seen.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }
}
