//! URL helpers shared by discovery and verification.

use url::Url;

/// Check if a URL is a usable http(s) target.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
        }
        Err(_) => false,
    }
}

/// Check whether a URL's host is the expected domain or a subdomain of it.
///
/// Comparison is case-insensitive on both sides. A URL without a host
/// component never matches.
#[must_use]
pub fn host_matches_domain(url: &str, domain: &str) -> bool {
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return false;
    }

    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();

    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Resolve an href against the page it was found on, returning an absolute
/// http(s) URL string or `None` for fragments, mailto links, and garbage.
#[must_use]
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if !matches!(absolute.scheme(), "http" | "https") {
        return None;
    }
    Some(absolute.to_string())
}
