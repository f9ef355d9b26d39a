//! Cookie channel: sanitization, wire encoding, and the prefixed store.
//!
//! - [`codec`] — key/value sanitization and `Set-Cookie` line building
//! - [`jar`] — the raw cookie channel ([`CookieJar`]) and its in-memory
//!   implementation ([`MemoryJar`])
//! - [`store`] — [`CookieStore`], the prefix-aware read/write/delete surface
//!   the engine talks to
//!
//! The cookie jar is the source of truth; nothing here keeps an in-memory
//! cache of entries.

pub mod codec;
pub mod jar;
pub mod store;

pub use jar::{CookieJar, MemoryJar};
pub use store::CookieStore;
