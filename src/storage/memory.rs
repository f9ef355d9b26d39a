//! In-process storage backend.

use dashmap::DashMap;

use crate::error::SyncError;
use crate::storage::StorageGateway;

/// In-memory [`StorageGateway`] for tests and non-browser hosts.
///
/// An optional entry quota makes the quota-exceeded error path exercisable:
/// inserting a new key beyond the quota fails the way a full browser
/// storage area would.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage area that refuses new keys past `max_entries`.
    pub fn with_quota(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota: Some(max_entries),
        }
    }
}

impl StorageGateway for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SyncError> {
        if let Some(quota) = self.quota {
            if !self.entries.contains_key(key) && self.entries.len() >= quota {
                return Err(SyncError::StorageQuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SyncError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), SyncError> {
        self.entries.clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
