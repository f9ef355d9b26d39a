//! # sds-sync
//!
//! Cross-subdomain storage synchronization over parent-domain cookies.
//!
//! `sds-sync` keeps `localStorage`/`sessionStorage`-shaped data consistent
//! across subdomains of one registrable domain: in-scope storage writes are
//! mirrored into cookies set on the parent domain, and on the next page
//! load those cookies are replayed back into storage.
//!
//! ## Features
//!
//! - **Replay pass**: cookies → storage on load, honoring the overwrite
//!   policy, with a structured [`SyncReport`] per pass
//! - **Key scoping**: exact and regex sync-key rules ([`SyncKeyRule`])
//! - **Cookie codec**: sanitization, percent-encoding, and size caps that
//!   respect the ~4KB cookie budget
//! - **Same-tab interception**: [`SyncedStorage`] decorator mirrors current-tab
//!   mutations into cookies
//! - **Cross-tab propagation**: feed platform [`StorageEvent`]s into the
//!   engine to mirror other tabs' writes
//! - **Readiness**: a one-shot [`SyncEngine::ready`] future plus a per-pass
//!   broadcast
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sds_sync::{MemoryJar, MemoryStorage, SyncEngine, SyncKeyRule};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let jar = Arc::new(MemoryJar::new());
//! let engine = SyncEngine::new(
//!     "app.example.com",
//!     jar,
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(MemoryStorage::new()),
//! );
//! engine.configure(|config| {
//!     config.sync_keys = vec![SyncKeyRule::from("theme")];
//! });
//! engine.initialize();
//!
//! // The application writes through the decorator; in-scope keys are
//! // mirrored into parent-domain cookies automatically.
//! use sds_sync::StorageGateway;
//! engine.synced_local().set("theme", "dark").unwrap();
//! assert_eq!(engine.read_from_cookie("theme").as_deref(), Some("dark"));
//!
//! let report = engine.ready().await;
//! assert_eq!(report.total_cookies, 0); // jar was empty on first load
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - runtime configuration and its repair-on-validate contract
//! - [`cookies`] - sanitization, wire encoding, jar trait, prefixed store
//! - [`domain`] - parent-domain resolution
//! - [`engine`] - replay pass, cross-tab handling, readiness signal
//! - [`matcher`] - sync-key rules and scoping
//! - [`storage`] - storage gateway seam, in-memory backend, sync decorator

pub mod config;
pub mod cookies;
pub mod domain;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod storage;

pub use config::{StorageType, SyncConfig};
pub use cookies::{CookieJar, CookieStore, MemoryJar};
pub use engine::{SkipReason, SkippedKey, SyncEngine, SyncReport, SyncedKey};
pub use error::SyncError;
pub use matcher::SyncKeyRule;
pub use storage::{MemoryStorage, StorageArea, StorageEvent, StorageGateway, SyncedStorage};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
