//! Replay-pass outcome reporting.

use serde::Serialize;

use crate::storage::StorageArea;

/// Outcome of one cookie-to-storage replay pass.
///
/// Produced fresh by each pass and immutable once emitted; the first report
/// also resolves the engine's ready future.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Number of storage writes performed across all target areas.
    pub synced_count: usize,
    pub synced_keys: Vec<SyncedKey>,
    pub skipped_keys: Vec<SkippedKey>,
    /// Number of sync cookies present when the pass started.
    pub total_cookies: usize,
}

impl SyncReport {
    /// True when the pass neither wrote nor deliberately skipped anything.
    pub fn is_noop(&self) -> bool {
        self.synced_count == 0 && self.skipped_keys.is_empty()
    }
}

/// One key written into a storage area during a replay pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedKey {
    pub key: String,
    pub storage_type: StorageArea,
    /// Whether a pre-existing value was replaced.
    pub overwritten: bool,
}

/// One key deliberately not written during a replay pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedKey {
    pub key: String,
    pub storage_type: StorageArea,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// A value already existed and the overwrite policy is disabled.
    Exists,
}
