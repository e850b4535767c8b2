//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path};

use crate::config::SiteConfig;

/// Characters that may not appear raw in a URL path
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Whether a link leaves the site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("mailto:")
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/schedule") // -> "/cis192/schedule"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, encode_url(path))
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/schedule") // -> "https://example.com/cis192/schedule"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Encode a URL path, leaving separators and existing escapes alone
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Normalize a site-relative path slug: leading `/`, no trailing `/`
///
/// `basics`, `/basics` and `/basics/` all become `/basics`; the empty
/// slug and `/` become `/`.
pub fn normalize_slug(slug: &str) -> String {
    let trimmed = slug.trim().trim_matches('/');
    format!("/{}", trimmed)
}

/// Whether a slug maps to a path inside the public directory
///
/// Every segment must be a plain name: no `..`, `.` or drive prefixes.
pub fn is_safe_slug(slug: &str) -> bool {
    let slug = normalize_slug(slug);
    Path::new(slug.trim_start_matches('/'))
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/cis192/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/schedule"), "/cis192/schedule");
        assert_eq!(url_for(&config, "assignments/"), "/cis192/assignments/");
        assert_eq!(url_for(&config, "/"), "/cis192/");
    }

    #[test]
    fn test_url_for_root_site() {
        let config = SiteConfig::default();
        assert_eq!(url_for(&config, "/"), "/");
        assert_eq!(url_for(&config, "/basics"), "/basics");
    }

    #[test]
    fn test_url_for_external() {
        let config = test_config();
        let hw = "https://raw.githubusercontent.com/CIS192/homework/master/assignment0.py";
        assert_eq!(url_for(&config, hw), hw);
    }

    #[test]
    fn test_url_for_encodes_spaces() {
        let config = SiteConfig::default();
        assert_eq!(url_for(&config, "/files/hw 1.py"), "/files/hw%201.py");
    }

    #[test]
    fn test_is_safe_slug() {
        assert!(is_safe_slug("/basics"));
        assert!(is_safe_slug("web/flask/"));
        assert!(is_safe_slug("/"));
        assert!(!is_safe_slug("/../../escaped"));
        assert!(!is_safe_slug("/notes/../../escaped"));
        assert!(!is_safe_slug("./basics"));
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/lectures"),
            "https://example.com/cis192/lectures"
        );
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("basics"), "/basics");
        assert_eq!(normalize_slug("/basics"), "/basics");
        assert_eq!(normalize_slug("/basics/"), "/basics");
        assert_eq!(normalize_slug("/"), "/");
        assert_eq!(normalize_slug("/ml/intro/"), "/ml/intro");
    }
}
