//! URL and e-mail helpers.

use url::Url;

/// Resolves `path` against the site root `site`.
///
/// A path without a leading `/` is treated as site-relative. URLs that carry
/// their own host keep it. The result is `scheme://host[:port]/path[?query]`;
/// fragments and credentials are dropped. A missing `path` is the site root.
pub fn absolute_url(path: Option<&str>, site: &str) -> String {
    let path = path.unwrap_or_default().trim();
    let path = path.split('#').next().unwrap_or_default();

    if let Some(own) = with_own_host(path, site) {
        return own;
    }

    let rooted = match path.starts_with('/') {
        true => tidy(path),
        false => tidy(&format!("/{}", path)),
    };
    match Url::parse(site) {
        Ok(base) => format!("{}{}", origin(&base), rooted),
        Err(e) => {
            log::warn!("Site URL '{}' is not absolute ({}), leaving '{}' relative", site, e, rooted);
            rooted
        }
    }
}

/// `path` rendered on its own host, if it names one. Scheme-relative paths
/// take the site's scheme.
fn with_own_host(path: &str, site: &str) -> Option<String> {
    let absolute = match path.strip_prefix("//") {
        Some(rest) => {
            let scheme = Url::parse(site).map(|b| b.scheme().to_string());
            format!("{}://{}", scheme.as_deref().unwrap_or("https"), rest)
        }
        None => path.to_string(),
    };
    let url = Url::parse(&absolute).ok().filter(Url::has_host)?;
    // Path and query are copied from the input so non-ASCII text stays readable.
    let after_scheme = absolute.split_once("://").map_or("", |(_, rest)| rest);
    let tail = after_scheme
        .find(['/', '?'])
        .map_or("", |at| &after_scheme[at..]);
    Some(format!("{}{}", origin(&url), tidy(tail)))
}

fn origin(url: &Url) -> String {
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), url.host_str().unwrap_or_default(), port),
        None => format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default()),
    }
}

/// Roots a path-and-query and drops an empty query.
fn tidy(tail: &str) -> String {
    let tail = tail.strip_suffix('?').unwrap_or(tail);
    match tail.starts_with('/') {
        true => tail.to_string(),
        false => format!("/{}", tail),
    }
}

/// Obfuscates an address for publishing: `a@b.ru` becomes `a(at)b.ru`.
pub fn email(text: Option<&str>) -> Option<String> {
    text.map(|t| t.replace('@', "(at)"))
}
