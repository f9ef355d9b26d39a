//! The sync engine: replay pass, cross-tab propagation, and lifecycle.
//!
//! One engine instance owns the validated configuration, the cookie store,
//! the raw storage gateways, and the readiness signal. Replay writes go
//! through the raw gateways the engine was constructed with, never through
//! a [`SyncedStorage`](crate::storage::SyncedStorage) decorator, so a
//! replay can never feed back into the cookie layer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::config::SyncConfig;
use crate::cookies::{CookieJar, CookieStore};
use crate::matcher::should_sync;
use crate::storage::{StorageArea, StorageEvent, StorageGateway, SyncedStorage};

pub mod report;
pub mod signal;

pub use report::{SkipReason, SkippedKey, SyncReport, SyncedKey};
pub use signal::ReadinessSignal;

pub struct SyncEngine {
    config: RwLock<SyncConfig>,
    cookies: CookieStore,
    local: Arc<dyn StorageGateway>,
    session: Arc<dyn StorageGateway>,
    signal: ReadinessSignal,
    initialized: AtomicBool,
}

impl SyncEngine {
    /// Build an engine with the default configuration.
    ///
    /// `hostname` is the current navigation host; the cookie-sharing
    /// domain is derived from it once, at construction.
    pub fn new(
        hostname: &str,
        jar: Arc<dyn CookieJar>,
        local: Arc<dyn StorageGateway>,
        session: Arc<dyn StorageGateway>,
    ) -> Arc<Self> {
        Self::with_config(SyncConfig::default(), hostname, jar, local, session)
    }

    pub fn with_config(
        config: SyncConfig,
        hostname: &str,
        jar: Arc<dyn CookieJar>,
        local: Arc<dyn StorageGateway>,
        session: Arc<dyn StorageGateway>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
            cookies: CookieStore::new(jar, hostname),
            local,
            session,
            signal: ReadinessSignal::new(),
            initialized: AtomicBool::new(false),
        })
    }

    /// Validate the configuration, check environment support, and run the
    /// first replay pass.
    ///
    /// Returns `false` without panicking when the environment is
    /// unsupported; in that case nothing was replayed and the ready future
    /// stays pending.
    pub fn initialize(&self) -> bool {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.validate();
        }

        if !self.is_supported() {
            warn!("cookie channel unavailable, sync disabled");
            self.initialized.store(false, Ordering::SeqCst);
            return false;
        }

        self.sync_cookies_to_storage();
        self.initialized.store(true, Ordering::SeqCst);
        true
    }

    /// Re-validate the (possibly mutated) configuration and replay again.
    ///
    /// Idempotent with respect to interception: decorators always wrap the
    /// raw gateways, so nothing is installed twice no matter how often this
    /// runs. The ready future keeps its first report.
    pub fn reinitialize(&self) -> bool {
        self.initialize()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Live environment check: a reserved cookie must round-trip through
    /// the jar. Jar contents are left exactly as they were found.
    pub fn is_supported(&self) -> bool {
        self.cookies.check_support(&self.config_read())
    }

    /// Mutate the configuration, then re-validate it.
    ///
    /// Returns whether the resulting configuration was already valid
    /// (repairs were applied otherwise). Takes effect on the next
    /// operation; call [`reinitialize`](Self::reinitialize) to replay under
    /// the new settings.
    pub fn configure<F: FnOnce(&mut SyncConfig)>(&self, mutate: F) -> bool {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut config);
        config.validate()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> SyncConfig {
        self.config_read().clone()
    }

    /// The cookie-sharing domain in use.
    pub fn cookie_domain(&self) -> String {
        self.cookies.domain().to_string()
    }

    // Cookie surface -------------------------------------------------------

    pub fn write_to_cookie(&self, key: &str, value: &str) -> bool {
        self.cookies.write(&self.config_read(), key, value)
    }

    pub fn read_from_cookie(&self, key: &str) -> Option<String> {
        self.cookies.read(&self.config_read(), key)
    }

    pub fn delete_from_cookie(&self, key: &str) -> bool {
        self.cookies.delete(&self.config_read(), key)
    }

    pub fn get_all_sync_cookies(&self) -> BTreeMap<String, String> {
        self.cookies.all(&self.config_read())
    }

    pub fn clear_all_sync_cookies(&self) -> usize {
        self.cookies.clear_all(&self.config_read())
    }

    // Replay ---------------------------------------------------------------

    /// The cookie-to-storage replay pass.
    ///
    /// For each sync cookie and each target area: matcher-rejected keys are
    /// skipped silently; a key is written when its cookie value is
    /// non-empty and either the overwrite policy is enabled or the area has
    /// no value yet (an empty cookie value is never written, even with
    /// overwrite enabled). A write failure on one key is logged and the
    /// pass continues. The resulting report is emitted to every subscriber
    /// and, on the first pass, resolves the ready future.
    pub fn sync_cookies_to_storage(&self) -> Arc<SyncReport> {
        // Snapshot the config so storage writes happen without the lock.
        let config = self.config_read().clone();
        let entries = self.cookies.all(&config);
        let total_cookies = entries.len();

        let mut synced_keys = Vec::new();
        let mut skipped_keys = Vec::new();

        for &area in config.storage_type.areas() {
            let storage = self.raw(area);
            for (key, value) in &entries {
                if !should_sync(&config.sync_keys, key) {
                    continue;
                }
                let existing = storage.get(key);
                if config.overwrite_existing || existing.is_none() {
                    if value.is_empty() {
                        continue;
                    }
                    match storage.set(key, value) {
                        Ok(()) => synced_keys.push(SyncedKey {
                            key: key.clone(),
                            storage_type: area,
                            overwritten: existing.is_some(),
                        }),
                        Err(e) => {
                            error!(%area, key, error = %e, "replay write failed, continuing");
                        }
                    }
                } else {
                    skipped_keys.push(SkippedKey {
                        key: key.clone(),
                        storage_type: area,
                        reason: SkipReason::Exists,
                    });
                }
            }
        }

        let report = SyncReport {
            synced_count: synced_keys.len(),
            synced_keys,
            skipped_keys,
            total_cookies,
        };
        if config.debug {
            debug!(
                synced = report.synced_count,
                skipped = report.skipped_keys.len(),
                total_cookies,
                "replay pass complete"
            );
        }
        self.signal.publish(report)
    }

    // Cross-tab propagation ------------------------------------------------

    /// Feed a cross-document storage notification into the cookie layer.
    ///
    /// A `key: None` event (another tab cleared the whole area) is
    /// deliberately not propagated to cookie deletion, so one tab's clear
    /// cannot destroy data shared with sibling subdomains.
    pub fn handle_storage_event(&self, event: &StorageEvent) {
        let config = self.config_read();
        if !config.storage_type.covers(event.area) {
            return;
        }
        let Some(key) = event.key.as_deref() else {
            if config.debug {
                debug!(area = %event.area, "ignoring cross-tab clear");
            }
            return;
        };
        if !should_sync(&config.sync_keys, key) {
            return;
        }
        match event.new_value.as_deref() {
            Some(value) => {
                self.cookies.write(&config, key, value);
            }
            None => {
                self.cookies.delete(&config, key);
            }
        }
    }

    // Same-tab interception ------------------------------------------------

    /// Sync-aware decorator over the raw local-storage gateway.
    pub fn synced_local(self: &Arc<Self>) -> SyncedStorage {
        SyncedStorage::new(Arc::clone(&self.local), StorageArea::Local, Arc::clone(self))
    }

    /// Sync-aware decorator over the raw session-storage gateway.
    pub fn synced_session(self: &Arc<Self>) -> SyncedStorage {
        SyncedStorage::new(
            Arc::clone(&self.session),
            StorageArea::Session,
            Arc::clone(self),
        )
    }

    /// Whether a same-tab mutation of `key` in `area` should be mirrored
    /// into the cookie layer.
    pub(crate) fn mirrors(&self, area: StorageArea, key: &str) -> bool {
        let config = self.config_read();
        config.storage_type.covers(area) && should_sync(&config.sync_keys, key)
    }

    // Readiness ------------------------------------------------------------

    /// Resolves with the first replay report; immediately if already
    /// resolved, never if no pass ever completes.
    pub async fn ready(&self) -> Arc<SyncReport> {
        self.signal.ready().await
    }

    /// The first replay report, if any pass has completed.
    pub fn first_report(&self) -> Option<Arc<SyncReport>> {
        self.signal.first()
    }

    /// Subscribe to the per-pass completion notification.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SyncReport>> {
        self.signal.subscribe()
    }

    // ----------------------------------------------------------------------

    fn config_read(&self) -> RwLockReadGuard<'_, SyncConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn raw(&self, area: StorageArea) -> &Arc<dyn StorageGateway> {
        match area {
            StorageArea::Local => &self.local,
            StorageArea::Session => &self.session,
        }
    }
}
