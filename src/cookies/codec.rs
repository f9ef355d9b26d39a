//! Key/value sanitization and cookie-line encoding.
//!
//! Keys are embedded in cookie names, so the characters that terminate or
//! structure a cookie line (`;`, `,`, `=`, whitespace) are replaced with
//! `_` before use. Values are percent-encoded on the wire and capped well
//! under the ~4KB per-cookie ceiling to leave headroom for the name and
//! attributes.

use cookie::{Cookie, SameSite};
use time::Duration;
use tracing::{debug, error, warn};

/// Keys longer than this are rejected outright.
pub const MAX_KEY_LEN: usize = 200;

/// Values longer than this are rejected to stay under the per-cookie size
/// ceiling with headroom for cookie metadata.
pub const MAX_VALUE_LEN: usize = 3500;

/// Sanitize a storage key for use in a cookie name.
///
/// Returns `None` for empty or over-long keys. Forbidden characters are
/// replaced with `_`; the replacement is logged when `debug_log` is set.
pub fn sanitize_key(key: &str, debug_log: bool) -> Option<String> {
    if key.is_empty() {
        if debug_log {
            warn!("rejecting empty storage key");
        }
        return None;
    }
    if key.chars().count() > MAX_KEY_LEN {
        if debug_log {
            warn!(max = MAX_KEY_LEN, "rejecting over-long storage key");
        }
        return None;
    }

    let sanitized: String = key
        .chars()
        .map(|c| {
            if c == ';' || c == ',' || c == '=' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized != key && debug_log {
        debug!(original = key, sanitized = sanitized.as_str(), "sanitized storage key");
    }

    Some(sanitized)
}

/// Sanitize a value before cookie encoding.
///
/// Returns `None` for values over [`MAX_VALUE_LEN`] characters; this is
/// always logged at error level since the write is silently lost otherwise.
pub fn sanitize_value(value: &str) -> Option<String> {
    if value.chars().count() > MAX_VALUE_LEN {
        error!(
            len = value.chars().count(),
            max = MAX_VALUE_LEN,
            "cookie value too large, refusing to persist"
        );
        return None;
    }
    Some(value.to_string())
}

/// Serialize one `Set-Cookie`-equivalent line with the crate's fixed
/// attributes: computed domain, `path=/`, `SameSite=Lax`, and the
/// configured max-age. Name and value are percent-encoded.
pub fn set_cookie_line(name: &str, value: &str, domain: &str, max_age_secs: u64) -> String {
    build_line(
        name,
        value,
        domain,
        Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)),
    )
}

/// Serialize an expiry line (`max-age=0`) for the given cookie name.
pub fn removal_line(name: &str, domain: &str) -> String {
    build_line(name, "", domain, Duration::ZERO)
}

fn build_line(name: &str, value: &str, domain: &str, max_age: Duration) -> String {
    Cookie::build((name, value))
        .domain(domain.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
        .encoded()
        .to_string()
}

/// Parse a `document.cookie`-shaped jar header into decoded (name, value)
/// pairs. Fragments without `=` or with undecodable percent-escapes are
/// skipped; the skip is logged when `debug_log` is set.
pub fn parse_jar(header: &str, debug_log: bool) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for fragment in header.split(';') {
        let fragment = fragment.trim();
        if fragment.is_empty() || !fragment.contains('=') {
            continue;
        }
        match Cookie::parse_encoded(fragment.to_string()) {
            Ok(cookie) => {
                entries.push((cookie.name().to_string(), cookie.value().to_string()));
            }
            Err(e) => {
                if debug_log {
                    warn!(fragment, error = %e, "skipping undecodable cookie fragment");
                }
            }
        }
    }
    entries
}
