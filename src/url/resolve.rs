use crate::UrlError;
use url::Url;

/// Resolves an href against a base URL, admitting only HTTP(S) results
///
/// Absolute hrefs are returned as-is (after parsing); relative ones are
/// joined onto `base`. Empty hrefs, fragments and non-web schemes such as
/// `data:` or `javascript:` yield `None`.
///
/// # Examples
///
/// ```
/// use embed_scout::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://1games.io/").unwrap();
/// let url = resolve_url(&base, "/game/neon-rider").unwrap().unwrap();
/// assert_eq!(url.as_str(), "https://1games.io/game/neon-rider");
/// ```
pub fn resolve_url(base: &Url, href: &str) -> Result<Option<Url>, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Ok(None);
    }

    let resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("'{}': {}", href, e)))?;

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Ok(Some(resolved))
    } else {
        Ok(None)
    }
}

/// Parses a site root, requiring an HTTP(S) scheme and a host
pub fn parse_site_url(base_url: &str) -> Result<Url, UrlError> {
    let url = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the last non-empty path segment of a URL
///
/// Trailing slashes are ignored, so `https://site/game/abc/` yields `abc`.
/// A URL with no path segments yields an empty string.
pub fn last_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_string()
}

/// Builds the listing URL for one page of a category
///
/// Format: `<base>/<category>.games?page=<page>&limit=<per_page>`
pub fn listing_url(base: &Url, category: &str, page: u32, per_page: u32) -> Result<Url, UrlError> {
    let mut url = base
        .join(&format!("/{}.games", category))
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("limit", &per_page.to_string());

    Ok(url)
}

/// Builds the dedicated embed URL for a game detail page
///
/// Format: `<base>/game/<slug>/` where the slug is the detail URL's last path segment.
pub fn embed_url(base: &Url, detail_url: &Url) -> Result<Url, UrlError> {
    let slug = last_path_segment(detail_url);
    if slug.is_empty() {
        return Err(UrlError::Parse(format!(
            "no game slug in detail URL '{}'",
            detail_url
        )));
    }

    base.join(&format!("/game/{}/", slug))
        .map_err(|e| UrlError::Parse(e.to_string()))
}
