use std::sync::Arc;

use sds_sync::{
    MemoryJar, MemoryStorage, StorageArea, StorageEvent, StorageGateway, StorageType,
    SyncEngine, SyncError, SyncKeyRule,
};

fn engine() -> (Arc<SyncEngine>, Arc<MemoryJar>) {
    let jar = Arc::new(MemoryJar::new());
    let engine = SyncEngine::new(
        "app.example.com",
        jar.clone(),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    );
    (engine, jar)
}

#[test]
fn test_set_mirrors_to_cookie() {
    let (engine, _) = engine();
    let local = engine.synced_local();
    local.set("theme", "dark").unwrap();
    assert_eq!(engine.read_from_cookie("theme"), Some("dark".to_string()));
}

#[test]
fn test_exact_rules_scope_mirroring() {
    let (engine, _) = engine();
    engine.configure(|config| {
        config.sync_keys = vec![SyncKeyRule::from("exact1"), SyncKeyRule::from("exact2")];
    });
    let local = engine.synced_local();
    local.set("exact1", "a").unwrap();
    local.set("exact2", "b").unwrap();
    local.set("other", "c").unwrap();

    let cookies = engine.get_all_sync_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.contains_key("exact1"));
    assert!(cookies.contains_key("exact2"));
    // The storage write itself still happened.
    assert_eq!(local.get("other"), Some("c".to_string()));
}

#[test]
fn test_pattern_rules_scope_mirroring() {
    let (engine, _) = engine();
    engine.configure(|config| {
        config.sync_keys = vec![
            SyncKeyRule::pattern("^chat_").unwrap(),
            SyncKeyRule::pattern("Session$").unwrap(),
        ];
    });
    let local = engine.synced_local();
    local.set("chat_id", "1").unwrap();
    local.set("chat_user", "alice").unwrap();
    local.set("userSession", "s").unwrap();
    local.set("other", "x").unwrap();

    let cookies = engine.get_all_sync_cookies();
    assert_eq!(cookies.len(), 3);
    assert!(!cookies.contains_key("other"));
}

#[test]
fn test_storage_type_scopes_areas() {
    let (engine, _) = engine();

    // localStorage only: session-side writes never reach the cookie layer.
    engine.synced_session().set("k", "v").unwrap();
    assert_eq!(engine.read_from_cookie("k"), None);

    engine.configure(|config| config.storage_type = StorageType::Both);
    engine.synced_session().set("k", "v").unwrap();
    assert_eq!(engine.read_from_cookie("k"), Some("v".to_string()));
    engine.synced_local().set("k2", "v2").unwrap();
    assert_eq!(engine.read_from_cookie("k2"), Some("v2".to_string()));
}

#[test]
fn test_remove_deletes_cookie() {
    let (engine, _) = engine();
    let local = engine.synced_local();
    local.set("k", "v").unwrap();
    local.remove("k").unwrap();
    assert_eq!(engine.read_from_cookie("k"), None);
    assert_eq!(local.get("k"), None);
}

#[test]
fn test_clear_deletes_only_matched_cookies() {
    let (engine, _) = engine();
    engine.configure(|config| {
        config.sync_keys = vec![SyncKeyRule::pattern("^chat_").unwrap()];
    });
    // A cookie outside the rule set, written through the direct API.
    engine.write_to_cookie("keepme", "v");

    let local = engine.synced_local();
    local.set("chat_id", "1").unwrap();
    local.set("unmatched", "2").unwrap();
    local.clear().unwrap();

    assert!(local.is_empty());
    let cookies = engine.get_all_sync_cookies();
    assert!(!cookies.contains_key("chat_id"));
    assert!(cookies.contains_key("keepme"));
}

#[test]
fn test_native_failure_skips_mirroring_and_propagates() {
    let jar = Arc::new(MemoryJar::new());
    let engine = SyncEngine::new(
        "app.example.com",
        jar.clone(),
        Arc::new(MemoryStorage::with_quota(1)),
        Arc::new(MemoryStorage::new()),
    );
    let local = engine.synced_local();
    local.set("a", "1").unwrap();

    let writes_before = jar.write_count();
    assert_eq!(local.set("b", "2"), Err(SyncError::StorageQuotaExceeded));
    // The failed key produced no cookie write.
    assert_eq!(jar.write_count(), writes_before);
}

#[test]
fn test_cross_tab_set_and_remove_propagate() {
    let (engine, _) = engine();

    engine.handle_storage_event(&StorageEvent::set(StorageArea::Local, "k", None, "v"));
    assert_eq!(engine.read_from_cookie("k"), Some("v".to_string()));

    engine.handle_storage_event(&StorageEvent::removed(StorageArea::Local, "k", "v"));
    assert_eq!(engine.read_from_cookie("k"), None);
}

#[test]
fn test_cross_tab_out_of_scope_area_is_ignored() {
    let (engine, _) = engine();
    engine.handle_storage_event(&StorageEvent::set(StorageArea::Session, "k", None, "v"));
    assert_eq!(engine.read_from_cookie("k"), None);
}

#[test]
fn test_cross_tab_filtered_by_sync_keys() {
    let (engine, _) = engine();
    engine.configure(|config| {
        config.sync_keys = vec![SyncKeyRule::from("allowed")];
    });
    engine.handle_storage_event(&StorageEvent::set(StorageArea::Local, "denied", None, "v"));
    assert_eq!(engine.read_from_cookie("denied"), None);
}

#[test]
fn test_cross_tab_clear_does_not_delete_cookies() {
    let (engine, _) = engine();
    engine.write_to_cookie("precious", "v");

    // Another tab cleared its storage; shared cookies must survive.
    engine.handle_storage_event(&StorageEvent::cleared(StorageArea::Local));
    assert_eq!(engine.read_from_cookie("precious"), Some("v".to_string()));
}

#[test]
fn test_same_tab_clear_asymmetry() {
    // Same-tab clear DOES delete matched cookies, unlike the cross-tab one.
    let (engine, _) = engine();
    let local = engine.synced_local();
    local.set("k", "v").unwrap();
    local.clear().unwrap();
    assert_eq!(engine.read_from_cookie("k"), None);
}

#[test]
fn test_reinitialize_never_stacks_interception() {
    let (engine, jar) = engine();
    assert!(engine.initialize());
    assert!(engine.reinitialize());
    assert!(engine.reinitialize());

    let local = engine.synced_local();
    let writes_before = jar.write_count();
    local.set("once", "1").unwrap();
    // One storage write, exactly one cookie write.
    assert_eq!(jar.write_count(), writes_before + 1);
}
