//! Same-tab change interception as an explicit decorator.
//!
//! The cross-document storage notification never fires for the tab that
//! made the change, so mutations in the current tab are caught here:
//! [`SyncedStorage`] wraps a raw gateway and mirrors in-scope mutations
//! into the cookie layer after the native operation succeeds. The engine
//! replays cookies through the raw gateway it was constructed with, so a
//! replay write can never re-enter this mirroring path.

use std::sync::Arc;

use tracing::error;

use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::storage::{StorageArea, StorageGateway};

/// Sync-aware [`StorageGateway`] decorator.
///
/// Obtain one from [`SyncEngine::synced_local`] or
/// [`SyncEngine::synced_session`]; those always wrap the engine's raw
/// gateway, so constructing a decorator repeatedly can never stack the
/// mirroring step.
pub struct SyncedStorage {
    inner: Arc<dyn StorageGateway>,
    area: StorageArea,
    engine: Arc<SyncEngine>,
}

impl SyncedStorage {
    pub(crate) fn new(
        inner: Arc<dyn StorageGateway>,
        area: StorageArea,
        engine: Arc<SyncEngine>,
    ) -> Self {
        Self { inner, area, engine }
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }
}

impl StorageGateway for SyncedStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SyncError> {
        if let Err(e) = self.inner.set(key, value) {
            // Native semantics preserved: log, then hand the error back
            // unchanged. The cookie mirror is skipped for this key.
            error!(area = %self.area, key, error = %e, "storage set failed");
            return Err(e);
        }
        if self.engine.mirrors(self.area, key) {
            self.engine.write_to_cookie(key, value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SyncError> {
        if let Err(e) = self.inner.remove(key) {
            error!(area = %self.area, key, error = %e, "storage remove failed");
            return Err(e);
        }
        if self.engine.mirrors(self.area, key) {
            self.engine.delete_from_cookie(key);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SyncError> {
        // Snapshot before the native clear; afterwards the keys are gone.
        let keys = self.inner.keys();
        if let Err(e) = self.inner.clear() {
            error!(area = %self.area, error = %e, "storage clear failed");
            return Err(e);
        }
        for key in keys {
            if self.engine.mirrors(self.area, &key) {
                self.engine.delete_from_cookie(&key);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
