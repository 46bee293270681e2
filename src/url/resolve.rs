use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the catalog root URL
///
/// The root must be an absolute http(s) URL with a host. Its path is forced to
/// end with `/` so that relative category links land beneath it.
///
/// # Examples
///
/// ```
/// use sumi_shelf::url::parse_root_url;
///
/// let root = parse_root_url("http://books.example.com/shop").unwrap();
/// assert_eq!(root.as_str(), "http://books.example.com/shop/");
/// ```
pub fn parse_root_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_fragment(None);

    Ok(url)
}

/// Builds the base URL that detail-page links are joined onto
pub fn catalogue_base(root: &Url, prefix: &str) -> UrlResult<Url> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Ok(root.clone());
    }

    let prefix = if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    };

    root.join(&prefix).map_err(|_| UrlError::Unresolvable {
        base: root.to_string(),
        href: prefix,
    })
}

/// Resolves a link href against the page that contained it
///
/// Rejects links that can never be fetched:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - anything that does not resolve to http(s)
pub fn resolve_link(base: &Url, href: &str) -> UrlResult<Url> {
    let href = href.trim();
    let unresolvable = || UrlError::Unresolvable {
        base: base.to_string(),
        href: href.to_string(),
    };

    if href.is_empty() || href.starts_with('#') {
        return Err(unresolvable());
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return Err(unresolvable());
    }

    let absolute = base.join(href).map_err(|_| unresolvable())?;
    match absolute.scheme() {
        "http" | "https" => Ok(absolute),
        _ => Err(unresolvable()),
    }
}

/// Resolves an item's detail href against the catalogue base
///
/// Listing pages link to details with parent-relative paths
/// (`../../../some-book_12/index.html`). Those parent segments are dropped and the
/// remainder is joined onto the catalogue base, so the same item resolves to the
/// same URL whichever listing page it appeared on.
pub fn resolve_detail_url(catalogue: &Url, href: &str) -> UrlResult<Url> {
    let mut relative = href.trim();
    loop {
        if let Some(rest) = relative.strip_prefix("../") {
            relative = rest;
        } else if let Some(rest) = relative.strip_prefix("./") {
            relative = rest;
        } else {
            break;
        }
    }

    resolve_link(catalogue, relative)
}
