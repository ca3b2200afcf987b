//! URL canonicalization and the trust-marker domain filter.

use url::Url;

/// Host substrings that mark a government or official domain.
pub const TRUST_MARKERS: &[&str] = &[".gob.", ".gov.", ".gov", ".gob", ".europa.eu", ".eu", ".es"];

/// `scheme://host[:port]/path` with trailing slashes removed.
///
/// Query strings, fragments and credentials are dropped. Returns `None` when
/// the URL does not parse or has no host.
pub fn canonicalize_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;

    let mut canonical = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        canonical.push_str(&format!(":{}", port));
    }
    canonical.push_str(url.path());

    Some(canonical.trim_end_matches('/').to_string())
}

/// Whether the URL's host contains at least one trust marker.
pub fn is_official_domain(url: &str) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    else {
        return false;
    };
    TRUST_MARKERS.iter().any(|marker| host.contains(marker))
}
