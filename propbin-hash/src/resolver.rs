//! Best-effort reverse lookup from hash to original name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{Hash, HashError, HashResult};

/// Dictionary files loaded by [`NameResolver::from_dir`] when no explicit
/// list is configured.
pub const DEFAULT_DICTIONARIES: &[&str] = &["hashes.game.txt", "hashes.binentries.txt"];

/// Reverse dictionary mapping lowercase hex hashes to lowercase names.
///
/// Loaded from newline-delimited `hash name` text files. Absent or partial
/// dictionaries only make logs less readable; lookups never fail, they
/// return `None`.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    names: HashMap<String, String>,
}

impl NameResolver {
    /// Creates a resolver that knows no names.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the given dictionary files from `dir`.
    ///
    /// A missing directory is an error; missing or unreadable files inside it
    /// are skipped with a warning.
    pub fn from_dir(dir: impl AsRef<Path>, files: &[&str]) -> HashResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(HashError::io_with_path(
                std::io::Error::new(std::io::ErrorKind::NotFound, "hash directory does not exist"),
                dir,
            ));
        }

        let mut resolver = Self::empty();
        for name in files {
            let path = dir.join(name);
            if !path.is_file() {
                debug!("Hash dictionary {} not present, skipping", path.display());
                continue;
            }
            match resolver.load_file(&path) {
                Ok(count) => info!("Loaded {} hashes from {}", count, name),
                Err(e) => warn!("Failed to load {}: {}", path.display(), e),
            }
        }
        Ok(resolver)
    }

    /// Loads one dictionary file, returning the number of names added.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> HashResult<usize> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| HashError::io_with_path(e, path))?;
        Ok(self.load_str(&String::from_utf8_lossy(&bytes)))
    }

    /// Parses `hash name` lines, returning the number of names added.
    ///
    /// Blank lines and `#` comments are ignored. Lines whose first token is
    /// not a hex number are skipped. Later entries replace earlier ones.
    pub fn load_str(&mut self, content: &str) -> usize {
        let mut added = 0;
        let mut skipped = 0;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((hash, name)) = line.split_once(' ') else {
                skipped += 1;
                continue;
            };
            let Some(key) = normalize_hex(hash) else {
                skipped += 1;
                continue;
            };
            self.names.insert(key, name.trim().to_lowercase());
            added += 1;
        }
        if skipped > 0 {
            debug!("Skipped {} malformed dictionary lines", skipped);
        }
        added
    }

    /// Registers a single name under its lowercase identity hash.
    pub fn insert(&mut self, name: &str) -> Hash {
        let hash = Hash::of_lower(name);
        self.names.insert(hash.to_hex(), name.to_lowercase());
        hash
    }

    /// Looks up the original name of `hash`.
    #[must_use]
    pub fn resolve(&self, hash: Hash) -> Option<&str> {
        self.names.get(&hash.to_hex()).map(String::as_str)
    }

    /// Looks up a name by hex key of any width (8 or 16 digits, optional `0x`).
    #[must_use]
    pub fn resolve_hex(&self, hex: &str) -> Option<&str> {
        self.names.get(&normalize_hex(hex)?).map(String::as_str)
    }

    /// Returns the name of `hash` for logging, or its hex form when unknown.
    #[must_use]
    pub fn display(&self, hash: Hash) -> Cow<'_, str> {
        match self.resolve(hash) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(hash.to_hex()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize_hex(token: &str) -> Option<String> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits.to_ascii_lowercase())
}
