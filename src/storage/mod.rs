//! Storage areas and the gateway seam.
//!
//! [`StorageGateway`] abstracts one storage area (`get/set/remove/clear`),
//! so the engine works the same against a browser-backed implementation or
//! the in-process [`MemoryStorage`]. [`SyncedStorage`] is the sync-aware
//! decorator the embedding application writes through; the engine keeps the
//! raw gateways for its replay pass.

use std::fmt;

use serde::Serialize;

use crate::error::SyncError;

pub mod memory;
pub mod synced;

pub use memory::MemoryStorage;
pub use synced::SyncedStorage;

/// Identity of one storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StorageArea {
    #[serde(rename = "localStorage")]
    Local,
    #[serde(rename = "sessionStorage")]
    Session,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageArea::Local => "localStorage",
            StorageArea::Session => "sessionStorage",
        })
    }
}

/// One storage area's mutation and enumeration surface.
///
/// Mutations return `Err` on native failures (quota, security restriction);
/// callers propagate these unchanged after logging.
pub trait StorageGateway: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SyncError>;
    fn remove(&self, key: &str) -> Result<(), SyncError>;
    fn clear(&self) -> Result<(), SyncError>;
    fn keys(&self) -> Vec<String>;

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A cross-document storage-change notification, as delivered by the
/// platform for writes made in *other* same-origin tabs.
///
/// `key: None` signals a full clear of the area.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub area: StorageArea,
}

impl StorageEvent {
    /// A set/update notification.
    pub fn set(area: StorageArea, key: &str, old: Option<&str>, new: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            old_value: old.map(str::to_string),
            new_value: Some(new.to_string()),
            area,
        }
    }

    /// A removal notification.
    pub fn removed(area: StorageArea, key: &str, old: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            old_value: Some(old.to_string()),
            new_value: None,
            area,
        }
    }

    /// A full-clear notification.
    pub fn cleared(area: StorageArea) -> Self {
        Self {
            key: None,
            old_value: None,
            new_value: None,
            area,
        }
    }
}
