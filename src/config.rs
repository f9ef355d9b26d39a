//! Runtime configuration for the sync engine.
//!
//! The configuration is owned by the engine and re-validated on every
//! (re)initialization. Validation never fails: invalid fields are repaired
//! to their defaults with an error-level diagnostic, matching the
//! "log and keep going" posture of the rest of the crate.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

use crate::matcher::SyncKeyRule;
use crate::storage::StorageArea;

pub const DEFAULT_COOKIE_PREFIX: &str = "sds_sync_";

/// Seven days. The bridge only needs to outlive a typical cross-subdomain
/// browsing session.
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 604_800;

/// Which storage areas participate in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageType {
    #[serde(rename = "localStorage")]
    Local,
    #[serde(rename = "sessionStorage")]
    Session,
    #[serde(rename = "both")]
    Both,
}

impl StorageType {
    pub fn areas(self) -> &'static [StorageArea] {
        match self {
            StorageType::Local => &[StorageArea::Local],
            StorageType::Session => &[StorageArea::Session],
            StorageType::Both => &[StorageArea::Local, StorageArea::Session],
        }
    }

    pub fn covers(self, area: StorageArea) -> bool {
        self.areas().contains(&area)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::Local => "localStorage",
            StorageType::Session => "sessionStorage",
            StorageType::Both => "both",
        }
    }
}

impl FromStr for StorageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "localStorage" => Ok(StorageType::Local),
            "sessionStorage" => Ok(StorageType::Session),
            "both" => Ok(StorageType::Both),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine configuration. Serializes with the field names the cookie-side
/// consumers already use (`storageType`, `cookieMaxAge`, ...), so the sync
/// policy can be shared with non-Rust embeddings as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    #[serde(deserialize_with = "storage_type_or_default")]
    pub storage_type: StorageType,
    pub overwrite_existing: bool,
    pub cookie_prefix: String,
    /// Cookie lifetime in seconds; must be positive.
    pub cookie_max_age: u64,
    /// Empty list means every key is in scope.
    pub sync_keys: Vec<SyncKeyRule>,
    /// Gates warn/debug diagnostics; errors are always emitted.
    pub debug: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Local,
            overwrite_existing: false,
            cookie_prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            cookie_max_age: DEFAULT_COOKIE_MAX_AGE,
            sync_keys: Vec::new(),
            debug: false,
        }
    }
}

impl SyncConfig {
    /// Repair invalid fields in place, logging each repair.
    ///
    /// Returns `true` when every field was already valid. Never fails.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        if self.cookie_prefix.is_empty() {
            error!(
                default = DEFAULT_COOKIE_PREFIX,
                "cookiePrefix must be a non-empty string, falling back to default"
            );
            self.cookie_prefix = DEFAULT_COOKIE_PREFIX.to_string();
            valid = false;
        }

        if self.cookie_max_age == 0 {
            error!(
                default = DEFAULT_COOKIE_MAX_AGE,
                "cookieMaxAge must be a positive number of seconds, falling back to default"
            );
            self.cookie_max_age = DEFAULT_COOKIE_MAX_AGE;
            valid = false;
        }

        let before = self.sync_keys.len();
        self.sync_keys
            .retain(|rule| !matches!(rule, SyncKeyRule::Exact(key) if key.is_empty()));
        if self.sync_keys.len() != before {
            error!(
                dropped = before - self.sync_keys.len(),
                "syncKeys must not contain empty strings, dropping"
            );
            valid = false;
        }

        valid
    }

    /// Load a configuration from a JSON file. Unknown `storageType` values
    /// are repaired to the default during deserialization; structural
    /// errors and invalid regex patterns are returned to the caller.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Persist the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

/// Lenient `storageType` deserialization: unknown values repair to
/// `localStorage` with a logged error rather than failing the whole load.
fn storage_type_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<StorageType, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        error!(
            value = raw.as_str(),
            "invalid storageType, falling back to localStorage"
        );
        StorageType::Local
    }))
}

/// Wire shape for sync-key rules: a plain string is an exact rule, an
/// object with a `pattern` field is a regex rule.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleRepr {
    Exact(String),
    Pattern { pattern: String },
}

impl<'de> Deserialize<'de> for SyncKeyRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RuleRepr::deserialize(deserializer)? {
            RuleRepr::Exact(key) => Ok(SyncKeyRule::Exact(key)),
            RuleRepr::Pattern { pattern } => match Regex::new(&pattern) {
                Ok(re) => Ok(SyncKeyRule::Pattern(re)),
                Err(e) => Err(serde::de::Error::custom(format!(
                    "invalid sync-key pattern {pattern:?}: {e}"
                ))),
            },
        }
    }
}
