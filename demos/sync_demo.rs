//! End-to-end walkthrough: one "tab" writes through the synced gateway,
//! a second "page load" on a sibling subdomain replays the cookies back
//! into its own storage.
//!
//! Run with `cargo run --example sync_demo`.

use std::sync::Arc;

use sds_sync::{
    MemoryJar, MemoryStorage, StorageGateway, SyncEngine, SyncKeyRule,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The jar is shared across "page loads", like a real browser's cookie
    // store for the parent domain.
    let jar = Arc::new(MemoryJar::new());

    // First load, on app.example.com.
    let engine = SyncEngine::new(
        "app.example.com",
        jar.clone(),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    );
    engine.configure(|config| {
        config.sync_keys = vec![
            SyncKeyRule::from("theme"),
            SyncKeyRule::pattern("^chat_").unwrap(),
        ];
    });
    engine.initialize();
    println!("cookie domain: {}", engine.cookie_domain());

    let local = engine.synced_local();
    local.set("theme", "dark").unwrap();
    local.set("chat_id", "42").unwrap();
    local.set("scratch", "not synced").unwrap();
    println!("cookies after writes: {:?}", engine.get_all_sync_cookies());

    // Second load, on www.example.com, with its own empty storage but the
    // same parent-domain jar.
    let second = SyncEngine::new(
        "www.example.com",
        jar,
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    );
    second.configure(|config| {
        config.sync_keys = vec![
            SyncKeyRule::from("theme"),
            SyncKeyRule::pattern("^chat_").unwrap(),
        ];
    });
    second.initialize();

    let report = second.ready().await;
    println!(
        "replayed {} of {} cookies on www.example.com",
        report.synced_count, report.total_cookies
    );
    let local = second.synced_local();
    println!("theme = {:?}", local.get("theme"));
    println!("chat_id = {:?}", local.get("chat_id"));
    println!("scratch = {:?}", local.get("scratch"));
}
