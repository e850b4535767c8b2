//! HTML fragments that are safe to splice into pages

use serde::{Serialize, Serializer};
use std::fmt;

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Where a piece of trusted markup came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Rendered from a lecture note or data-file Markdown
    Markdown { slug: String },
    /// Plain text, escaped on the way in
    Escaped,
    /// A literal compiled into the binary
    Static,
    /// Built by concatenating other trusted fragments
    Composed,
}

/// Markup that may be emitted verbatim.
///
/// Templates only mark values of this type as `safe`; every other value in a
/// template context is auto-escaped. There is no public constructor taking an
/// arbitrary `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml {
    html: String,
    provenance: Provenance,
}

impl TrustedHtml {
    /// An empty fragment
    pub fn new() -> Self {
        Self {
            html: String::new(),
            provenance: Provenance::Composed,
        }
    }

    /// Escape plain text
    pub fn escape(text: &str) -> Self {
        Self {
            html: html_escape(text),
            provenance: Provenance::Escaped,
        }
    }

    /// Wrap markup written into the source code
    pub fn from_static(html: &'static str) -> Self {
        Self {
            html: html.to_string(),
            provenance: Provenance::Static,
        }
    }

    /// Output of the Markdown renderer
    pub(crate) fn from_markdown(html: String, slug: &str) -> Self {
        Self {
            html,
            provenance: Provenance::Markdown {
                slug: slug.to_string(),
            },
        }
    }

    /// Build `<tag attr="value">children</tag>`; attribute values are escaped
    pub fn element(tag: &'static str, attrs: &[(&'static str, &str)], children: &TrustedHtml) -> Self {
        let mut html = String::with_capacity(children.html.len() + 32);
        html.push('<');
        html.push_str(tag);
        push_attrs(&mut html, attrs);
        html.push('>');
        html.push_str(&children.html);
        html.push_str("</");
        html.push_str(tag);
        html.push('>');

        Self {
            html,
            provenance: Provenance::Composed,
        }
    }

    /// Build a void element such as `<img src="...">`
    pub fn void_element(tag: &'static str, attrs: &[(&'static str, &str)]) -> Self {
        let mut html = String::from("<");
        html.push_str(tag);
        push_attrs(&mut html, attrs);
        html.push('>');

        Self {
            html,
            provenance: Provenance::Composed,
        }
    }

    /// Append another fragment
    pub fn push(&mut self, other: &TrustedHtml) {
        if self.html.is_empty() {
            self.provenance = other.provenance.clone();
        } else if !other.html.is_empty() {
            self.provenance = Provenance::Composed;
        }
        self.html.push_str(&other.html);
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl Default for TrustedHtml {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl Serialize for TrustedHtml {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.html)
    }
}

impl FromIterator<TrustedHtml> for TrustedHtml {
    fn from_iter<I: IntoIterator<Item = TrustedHtml>>(iter: I) -> Self {
        let mut out = TrustedHtml::new();
        for fragment in iter {
            out.push(&fragment);
        }
        out
    }
}

fn push_attrs(html: &mut String, attrs: &[(&'static str, &str)]) {
    for (name, value) in attrs {
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        html.push_str(&html_escape(value));
        html.push('"');
    }
}

/// Generate an anchor tag
///
/// Site-relative paths go through `url_for`; external links open in a new tab.
pub fn link_to(config: &SiteConfig, path: &str, text: &TrustedHtml) -> TrustedHtml {
    let href = url_for(config, path);
    if is_external(path) {
        TrustedHtml::element(
            "a",
            &[("href", &href), ("target", "_blank"), ("rel", "noopener")],
            text,
        )
    } else {
        TrustedHtml::element("a", &[("href", &href)], text)
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        let html = TrustedHtml::escape("<script>alert('x')</script>");
        assert_eq!(
            html.as_str(),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(html.provenance(), &Provenance::Escaped);
    }

    #[test]
    fn test_element_escapes_attributes() {
        let text = TrustedHtml::escape("Notes");
        let a = TrustedHtml::element("a", &[("href", "/x?a=1&b=\"2\"")], &text);
        assert_eq!(a.as_str(), r#"<a href="/x?a=1&amp;b=&quot;2&quot;">Notes</a>"#);
        assert_eq!(a.provenance(), &Provenance::Composed);
    }

    #[test]
    fn test_push_provenance() {
        let mut html = TrustedHtml::new();
        html.push(&TrustedHtml::from_static("<br>"));
        assert_eq!(html.provenance(), &Provenance::Static);
        html.push(&TrustedHtml::escape("a"));
        assert_eq!(html.provenance(), &Provenance::Composed);
        assert_eq!(html.as_str(), "<br>a");
    }

    #[test]
    fn test_link_to() {
        let config = SiteConfig::default();
        let text = TrustedHtml::escape("Notes");
        assert_eq!(
            link_to(&config, "/basics", &text).as_str(),
            r#"<a href="/basics">Notes</a>"#
        );
        assert_eq!(
            link_to(&config, "https://example.com/hw0.py", &text).as_str(),
            r#"<a href="https://example.com/hw0.py" target="_blank" rel="noopener">Notes</a>"#
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let html = TrustedHtml::from_static("<hr>");
        assert_eq!(serde_json::to_string(&html).unwrap(), r#""<hr>""#);
    }
}
