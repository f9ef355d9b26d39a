//! Prefix-aware cookie store.
//!
//! [`CookieStore`] is the surface the engine and interceptors talk to. It
//! owns the computed parent domain and a handle to the raw jar; the active
//! prefix, max-age, and debug flag come in with each call so configuration
//! changes apply immediately.

use std::collections::BTreeMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error};

use crate::config::SyncConfig;
use crate::cookies::codec;
use crate::cookies::jar::CookieJar;
use crate::domain::parent_domain;

/// Reserved cookie name for the environment support check. Deliberately
/// not built from the sync prefix: every user cookie is `prefix + key`
/// with a non-empty key, so this name can never shadow one.
const SUPPORT_CHECK_COOKIE: &str = "__sds_support_check__";

pub struct CookieStore {
    jar: Arc<dyn CookieJar>,
    domain: String,
}

impl CookieStore {
    pub fn new(jar: Arc<dyn CookieJar>, hostname: &str) -> Self {
        Self {
            jar,
            domain: parent_domain(hostname),
        }
    }

    /// The cookie-sharing domain computed from the hostname.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Persist `key=value` under the sync prefix.
    ///
    /// Returns `false` when either side fails sanitization; never panics.
    pub fn write(&self, config: &SyncConfig, key: &str, value: &str) -> bool {
        let Some(key) = codec::sanitize_key(key, config.debug) else {
            return false;
        };
        let Some(value) = codec::sanitize_value(value) else {
            return false;
        };

        let name = format!("{}{}", config.cookie_prefix, key);
        let line = codec::set_cookie_line(&name, &value, &self.domain, config.cookie_max_age);
        self.jar.write(&line);
        if config.debug {
            debug!(name, "cookie written");
        }
        true
    }

    /// Read back the value stored for `key`, or `None` if absent or
    /// undecodable. The key goes through the same sanitization as `write`,
    /// so the original unsanitized key argument round-trips.
    pub fn read(&self, config: &SyncConfig, key: &str) -> Option<String> {
        let key = codec::sanitize_key(key, config.debug)?;
        let name = format!("{}{}", config.cookie_prefix, key);
        codec::parse_jar(&self.jar.read(), config.debug)
            .into_iter()
            .find(|(n, _)| n == &name)
            .map(|(_, value)| value)
    }

    /// Expire the cookie for `key`. Returns `false` on sanitization failure.
    pub fn delete(&self, config: &SyncConfig, key: &str) -> bool {
        let Some(key) = codec::sanitize_key(key, config.debug) else {
            return false;
        };
        let name = format!("{}{}", config.cookie_prefix, key);
        self.jar.write(&codec::removal_line(&name, &self.domain));
        if config.debug {
            debug!(name, "cookie deleted");
        }
        true
    }

    /// All cookies under the sync prefix, with the prefix stripped and
    /// values decoded. Malformed jar fragments are skipped.
    pub fn all(&self, config: &SyncConfig) -> BTreeMap<String, String> {
        codec::parse_jar(&self.jar.read(), config.debug)
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(&config.cookie_prefix)
                    .map(|key| (key.to_string(), value))
            })
            .collect()
    }

    /// Delete every sync cookie; returns the number of successful deletions.
    pub fn clear_all(&self, config: &SyncConfig) -> usize {
        self.all(config)
            .keys()
            .filter(|key| self.delete(config, key))
            .count()
    }

    /// Environment support check: a reserved cookie must round-trip
    /// through the jar. Restores whatever that name held beforehand, so
    /// repeated checks never disturb jar contents.
    pub fn check_support(&self, config: &SyncConfig) -> bool {
        let name = SUPPORT_CHECK_COOKIE;
        let prior = codec::parse_jar(&self.jar.read(), false)
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value);

        // A per-call token, so a stale leftover value can't pass the check.
        let token = OffsetDateTime::now_utc().unix_timestamp_nanos().to_string();
        self.jar
            .write(&codec::set_cookie_line(name, &token, &self.domain, 60));
        let seen = codec::parse_jar(&self.jar.read(), false)
            .into_iter()
            .any(|(n, v)| n == name && v == token);

        match prior {
            Some(value) => self.jar.write(&codec::set_cookie_line(
                name,
                &value,
                &self.domain,
                config.cookie_max_age,
            )),
            None => self.jar.write(&codec::removal_line(name, &self.domain)),
        }

        if !seen {
            error!(
                domain = self.domain.as_str(),
                "cookie jar support check failed"
            );
        }
        seen
    }
}
