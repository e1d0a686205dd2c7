use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use embed_scout::url::extract_domain;
///
/// let url = Url::parse("https://1GAMES.io/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("1games.io".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` is served from the same host as `site`
///
/// Hosts are compared case-insensitively and exactly: a subdomain such as
/// `cdn.1games.io` is a different host from `1games.io`. URLs without a host
/// never match.
pub fn is_same_site(url: &Url, site: &Url) -> bool {
    match (extract_domain(url), extract_domain(site)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
