use std::sync::Arc;

use sds_sync::{
    CookieJar, MemoryJar, MemoryStorage, StorageType, SyncEngine, SyncKeyRule,
};

fn parts() -> (Arc<MemoryJar>, Arc<MemoryStorage>, Arc<MemoryStorage>) {
    (
        Arc::new(MemoryJar::new()),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    )
}

fn engine_on(
    jar: Arc<MemoryJar>,
    local: Arc<MemoryStorage>,
    session: Arc<MemoryStorage>,
) -> Arc<SyncEngine> {
    SyncEngine::new("app.example.com", jar, local, session)
}

#[test]
fn test_default_configuration() {
    let (jar, local, session) = parts();
    let engine = engine_on(jar, local, session);
    let config = engine.config();
    assert_eq!(config.storage_type, StorageType::Local);
    assert!(!config.overwrite_existing);
    assert_eq!(config.cookie_prefix, "sds_sync_");
    assert!(config.sync_keys.is_empty());
}

#[test]
fn test_replay_writes_missing_keys() {
    use sds_sync::StorageGateway;

    let (jar, local, session) = parts();
    let engine = engine_on(jar, local.clone(), session);
    engine.write_to_cookie("theme", "dark");
    engine.write_to_cookie("lang", "en");

    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.synced_count, 2);
    assert_eq!(report.total_cookies, 2);
    assert!(report.skipped_keys.is_empty());
    assert_eq!(local.get("theme"), Some("dark".to_string()));
    assert_eq!(local.get("lang"), Some("en".to_string()));
}

#[test]
fn test_replay_respects_overwrite_policy() {
    use sds_sync::StorageGateway;

    let (jar, local, session) = parts();
    local.set("theme", "old").unwrap();
    let engine = engine_on(jar, local.clone(), session);
    engine.write_to_cookie("theme", "new");

    // Overwrite disabled: existing value wins and the skip is recorded.
    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.synced_count, 0);
    assert_eq!(report.skipped_keys.len(), 1);
    assert_eq!(report.skipped_keys[0].key, "theme");
    assert_eq!(local.get("theme"), Some("old".to_string()));

    // Overwrite enabled: cookie value replaces it, flagged as overwritten.
    engine.configure(|config| config.overwrite_existing = true);
    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.synced_count, 1);
    assert!(report.synced_keys[0].overwritten);
    assert_eq!(local.get("theme"), Some("new".to_string()));
}

#[test]
fn test_replay_filters_through_sync_keys() {
    use sds_sync::StorageGateway;

    let (jar, local, session) = parts();
    let engine = engine_on(jar, local.clone(), session);
    engine.configure(|config| {
        config.sync_keys = vec![SyncKeyRule::from("exact1"), SyncKeyRule::from("exact2")];
    });
    engine.write_to_cookie("exact1", "a");
    engine.write_to_cookie("exact2", "b");
    engine.write_to_cookie("other", "c");

    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.synced_count, 2);
    assert_eq!(local.get("exact1"), Some("a".to_string()));
    assert_eq!(local.get("exact2"), Some("b".to_string()));
    assert_eq!(local.get("other"), None);
}

#[test]
fn test_replay_targets_configured_areas() {
    use sds_sync::StorageGateway;

    let (jar, local, session) = parts();
    let engine = engine_on(jar, local.clone(), session.clone());
    engine.write_to_cookie("k", "v");

    engine.configure(|config| config.storage_type = StorageType::Session);
    engine.sync_cookies_to_storage();
    assert_eq!(local.get("k"), None);
    assert_eq!(session.get("k"), Some("v".to_string()));

    engine.configure(|config| config.storage_type = StorageType::Both);
    let report = engine.sync_cookies_to_storage();
    assert_eq!(local.get("k"), Some("v".to_string()));
    // Session already holds the value, so that side is an exists-skip.
    assert_eq!(report.synced_count, 1);
    assert_eq!(report.skipped_keys.len(), 1);
}

#[test]
fn test_empty_cookie_value_is_never_replayed() {
    use sds_sync::StorageGateway;

    let (jar, local, session) = parts();
    let engine = engine_on(jar, local.clone(), session);
    engine.configure(|config| config.overwrite_existing = true);
    engine.write_to_cookie("blank", "");

    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.total_cookies, 1);
    assert_eq!(report.synced_count, 0);
    assert_eq!(local.get("blank"), None);
}

#[test]
fn test_replay_survives_quota_failures() {
    use sds_sync::StorageGateway;

    let (jar, _, session) = parts();
    let local = Arc::new(MemoryStorage::with_quota(1));
    let engine = engine_on(jar, local.clone(), session);
    engine.write_to_cookie("a", "1");
    engine.write_to_cookie("b", "2");

    // One write fits, the other fails, the pass still completes and reports.
    let report = engine.sync_cookies_to_storage();
    assert_eq!(report.total_cookies, 2);
    assert_eq!(report.synced_count, 1);
    assert_eq!(local.len(), 1);
}

#[tokio::test]
async fn test_ready_resolves_with_first_report() {
    let (jar, local, session) = parts();
    let engine = engine_on(jar, local, session);
    engine.write_to_cookie("k", "v");
    assert!(engine.initialize());
    assert!(engine.is_initialized());

    let first = engine.ready().await;
    assert_eq!(first.synced_count, 1);
    assert_eq!(first.total_cookies, 1);

    // Later passes broadcast but never change the ready value.
    let mut passes = engine.subscribe();
    engine.sync_cookies_to_storage();
    let second = passes.recv().await.unwrap();
    assert_eq!(second.skipped_keys.len(), 1);
    assert_eq!(engine.ready().await.synced_count, 1);
    assert_eq!(engine.first_report().unwrap().synced_count, 1);
}

struct DeadJar;

impl CookieJar for DeadJar {
    fn read(&self) -> String {
        String::new()
    }

    fn write(&self, _set_cookie_line: &str) {}
}

#[test]
fn test_unsupported_environment_aborts_initialization() {
    let engine = SyncEngine::new(
        "app.example.com",
        Arc::new(DeadJar),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    );
    assert!(!engine.is_supported());
    assert!(!engine.initialize());
    assert!(!engine.is_initialized());
    assert!(engine.first_report().is_none());
}

#[test]
fn test_reinitialize_leaves_sync_cookies_untouched() {
    let (jar, local, session) = parts();
    let engine = engine_on(jar.clone(), local, session);
    engine.write_to_cookie("__support", "user-data");
    engine.write_to_cookie("theme", "dark");

    assert!(engine.initialize());
    assert!(engine.reinitialize());

    // Initialization must not consume, expire, or alter any sync cookie,
    // whatever the key looks like.
    assert_eq!(
        engine.read_from_cookie("__support"),
        Some("user-data".to_string())
    );
    assert_eq!(engine.read_from_cookie("theme"), Some("dark".to_string()));
    assert_eq!(jar.len(), 2);
}

#[test]
fn test_cookie_domain_from_hostname() {
    let (jar, local, session) = parts();
    let engine = engine_on(jar, local, session);
    assert_eq!(engine.cookie_domain(), ".example.com");
}
