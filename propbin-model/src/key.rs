//! Hash-or-name keys.

use propbin_hash::{Hash, NameResolver};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A reference to something named: either its hash or the raw name.
///
/// Most keys are hashes. Raw names appear in hand-authored entries and in
/// link payloads that carry the original path string. Two keys denote the
/// same thing when their [`Key::to_hash`] values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Hash(Hash),
    Name(String),
}

impl Key {
    /// Key holding the lowercase hash of `name`.
    #[must_use]
    pub fn hashed(name: &str) -> Self {
        Self::Hash(Hash::of_lower(name))
    }

    /// Key holding `name` verbatim.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Canonical hash; names hash lowercased.
    #[must_use]
    pub fn to_hash(&self) -> Hash {
        match self {
            Self::Hash(h) => *h,
            Self::Name(n) => Hash::of_lower(n),
        }
    }

    /// Returns the raw name when the key carries one.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(n) => Some(n),
            Self::Hash(_) => None,
        }
    }

    /// Name of the key: the raw name, or the resolver's answer for a hash.
    #[must_use]
    pub fn resolve<'a>(&'a self, resolver: &'a NameResolver) -> Option<&'a str> {
        match self {
            Self::Name(n) => Some(n),
            Self::Hash(h) => resolver.resolve(*h),
        }
    }

    /// Human-readable form for logs; never fails.
    #[must_use]
    pub fn display<'a>(&'a self, resolver: &'a NameResolver) -> Cow<'a, str> {
        match self {
            Self::Name(n) => Cow::Borrowed(n),
            Self::Hash(h) => resolver.display(*h),
        }
    }
}

impl From<Hash> for Key {
    fn from(h: Hash) -> Self {
        Self::Hash(h)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(h) => write!(f, "{h}"),
            Self::Name(n) => write!(f, "{n}"),
        }
    }
}
