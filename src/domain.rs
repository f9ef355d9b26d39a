//! Parent-domain resolution for cookie scoping.
//!
//! Cookies are shared across subdomains by setting them on the parent
//! domain (e.g. `.example.com` for `app.example.com` and `www.example.com`).
//! `localhost` and raw IPv4 hosts have no shareable parent and pass through
//! unchanged.

/// Derive the cookie-sharing domain from a hostname.
///
/// - `localhost` and dotted-quad IPv4 literals are returned as-is.
/// - Hostnames with more than two labels collapse to `.` + the last two
///   labels (`deep.sub.example.com` -> `.example.com`).
/// - Anything else gets a leading dot (`example.com` -> `.example.com`).
///
/// Note this is the literal last-two-labels rule, not a public-suffix
/// lookup; `app.example.co.uk` resolves to `.co.uk`, which browsers will
/// reject at set time.
pub fn parent_domain(hostname: &str) -> String {
    if hostname == "localhost" || is_dotted_quad(hostname) {
        return hostname.to_string();
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() > 2 {
        format!(".{}", labels[labels.len() - 2..].join("."))
    } else {
        format!(".{hostname}")
    }
}

/// True for `d.d.d.d` where every label is all digits.
fn is_dotted_quad(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    labels.len() == 4
        && labels
            .iter()
            .all(|label| !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()))
}
