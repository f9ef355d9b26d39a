//! Sync-key matching.
//!
//! The sync-key list decides which storage keys participate in cookie
//! mirroring. A rule is either an exact key or a regex tested against the
//! full key; an empty rule list means "sync everything".

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One entry of the sync-key list.
#[derive(Debug, Clone)]
pub enum SyncKeyRule {
    /// Case-sensitive equality with the storage key.
    Exact(String),
    /// Unanchored regex test against the storage key.
    Pattern(Regex),
}

impl SyncKeyRule {
    /// Compile a pattern rule, surfacing the regex error to the caller.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(SyncKeyRule::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            SyncKeyRule::Exact(expected) => expected == key,
            SyncKeyRule::Pattern(re) => re.is_match(key),
        }
    }
}

impl PartialEq for SyncKeyRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SyncKeyRule::Exact(a), SyncKeyRule::Exact(b)) => a == b,
            (SyncKeyRule::Pattern(a), SyncKeyRule::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for SyncKeyRule {
    fn from(key: &str) -> Self {
        SyncKeyRule::Exact(key.to_string())
    }
}

// Exact rules serialize as plain strings, patterns as `{"pattern": "..."}`.
impl Serialize for SyncKeyRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SyncKeyRule::Exact(key) => serializer.serialize_str(key),
            SyncKeyRule::Pattern(re) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("pattern", re.as_str())?;
                map.end()
            }
        }
    }
}

/// Whether `key` is in scope for sync under the given rule list.
///
/// Empty keys never sync. An empty rule list syncs every key. Otherwise the
/// first matching rule wins; rule order only affects how early the scan
/// stops.
pub fn should_sync(rules: &[SyncKeyRule], key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    if rules.is_empty() {
        return true;
    }
    rules.iter().any(|rule| rule.matches(key))
}
