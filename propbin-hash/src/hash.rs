//! Hash newtypes used as identities, type keys, and field names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use xxhash_rust::xxh64::xxh64;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of a name.
///
/// Entry identities, entry types, struct types, and field names are all
/// stored as this hash. By convention names are lowercased before hashing;
/// use [`Hash::of_lower`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash(u32);

impl Hash {
    /// Hashes `name` exactly as given.
    #[must_use]
    pub const fn of(name: &str) -> Self {
        Self(fnv1a(name.as_bytes(), false))
    }

    /// Hashes `name` after ASCII-lowercasing it.
    #[must_use]
    pub const fn of_lower(name: &str) -> Self {
        Self(fnv1a(name.as_bytes(), true))
    }

    /// Wraps a raw hash value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw hash value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the 8-digit lowercase hex form used by hash dictionaries.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.0)
    }
}

const fn fnv1a(bytes: &[u8], lowercase: bool) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        let b = if lowercase {
            bytes[i].to_ascii_lowercase()
        } else {
            bytes[i]
        };
        h = (h ^ b as u32).wrapping_mul(FNV_PRIME);
        i += 1;
    }
    h
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Hash {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        Ok(Self(u32::from_str_radix(digits, 16)?))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 64-bit xxh64 hash of a container path.
///
/// Containers shipped without their original names are stored on disk as
/// `<16 hex digits>.<ext>`, where the digits are this hash of the
/// lowercased, forward-slash path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathHash(u64);

impl PathHash {
    /// Hashes a container path after normalizing case and separators.
    #[must_use]
    pub fn of(path: &str) -> Self {
        Self(xxh64(normalize_path(path).as_bytes(), 0))
    }

    /// Returns the raw hash value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the 16-digit lowercase hex form used for hashed filenames.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for PathHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Lowercases a logical path and converts backslashes to forward slashes.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.to_lowercase().replace('\\', "/")
}
