//! The raw cookie channel.
//!
//! [`CookieJar`] has the same shape as `document.cookie`: reading yields the
//! whole jar as `name=value; name2=value2`, writing accepts one
//! `Set-Cookie`-style line. A browser embedding implements this against the
//! real document; [`MemoryJar`] backs tests and non-browser hosts.

use std::sync::atomic::{AtomicUsize, Ordering};

use cookie::Cookie;
use dashmap::DashMap;
use time::Duration;

/// A `document.cookie`-shaped cookie channel.
///
/// Implementations must treat a write with `Max-Age=0` (or negative) as
/// deletion of that cookie name, mirroring browser behavior.
pub trait CookieJar: Send + Sync {
    /// The full jar as `name=value` pairs joined by `; `. Values are
    /// returned exactly as written (still percent-encoded).
    fn read(&self) -> String;

    /// Apply one `Set-Cookie`-equivalent line. Never fails; a malformed
    /// line is ignored, like an invalid `document.cookie` assignment.
    fn write(&self, set_cookie_line: &str);
}

/// In-memory [`CookieJar`] for tests and non-browser hosts.
///
/// Stores raw (encoded) values keyed by cookie name and counts every write
/// call, which the interception-idempotence tests rely on.
#[derive(Debug, Default)]
pub struct MemoryJar {
    cookies: DashMap<String, String>,
    writes: AtomicUsize,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls observed, including deletions.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieJar for MemoryJar {
    fn read(&self) -> String {
        self.cookies
            .iter()
            .map(|entry| format!("{}={}", entry.key(), entry.value()))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, set_cookie_line: &str) {
        self.writes.fetch_add(1, Ordering::SeqCst);

        // Parse without decoding so the stored value keeps its escapes,
        // exactly like a real jar.
        let Ok(cookie) = Cookie::parse(set_cookie_line.to_string()) else {
            return;
        };

        let expired = cookie
            .max_age()
            .is_some_and(|max_age| max_age <= Duration::ZERO);
        if expired {
            self.cookies.remove(cookie.name());
        } else {
            self.cookies
                .insert(cookie.name().to_string(), cookie.value().to_string());
        }
    }
}
