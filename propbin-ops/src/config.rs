//! Tool configuration, read from `~/.propbin/config.toml`.

use std::path::{Path, PathBuf};

use propbin_hash::DEFAULT_DICTIONARIES;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dedup::ConflictPolicy;

/// Settings shared by every engine. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Directory holding the hash dictionaries. `None` disables name lookup.
    pub hash_dir: Option<PathBuf>,
    /// Dictionary file names looked up inside `hash_dir`.
    pub dictionaries: Vec<String>,
    /// Container file extension, without the dot.
    pub extension: String,
    pub first_variant: u32,
    pub last_variant: u32,
    pub conflict_policy: ConflictPolicy,
    /// Whether prune drops candidates whose identity has no known name.
    pub remove_unresolved: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            hash_dir: None,
            dictionaries: DEFAULT_DICTIONARIES.iter().map(|s| (*s).to_string()).collect(),
            extension: "bin".to_string(),
            first_variant: 0,
            last_variant: 99,
            conflict_policy: ConflictPolicy::KeepFirst,
            remove_unresolved: true,
        }
    }
}

impl ToolConfig {
    /// Loads `~/.propbin/config.toml`, or defaults when there is none.
    pub fn load() -> Self {
        Self::load_from(&config_dir().join("config.toml"))
    }

    /// Loads an explicit file. A missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Dictionary names as borrowed strings, the form the resolver takes.
    pub fn dictionary_names(&self) -> Vec<&str> {
        self.dictionaries.iter().map(String::as_str).collect()
    }

    /// Inclusive variant index range used by the clone engine.
    pub fn variants(&self) -> std::ops::RangeInclusive<u32> {
        self.first_variant..=self.last_variant
    }
}

fn config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        Path::new(&home).join(".propbin")
    } else if let Ok(home) = std::env::var("USERPROFILE") {
        Path::new(&home).join(".propbin")
    } else {
        PathBuf::from(".propbin")
    }
}
