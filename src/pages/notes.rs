//! Lecture note pages
//!
//! A note page is the rendered note spliced, unmodified, into a fixed shell:
//! a link back to the index, the note body, a credit line and a link to the
//! full lecture listing.

use anyhow::Result;

use super::{PageRenderer, NOTES_LISTING};
use crate::content::{Document, NoteStore};

impl PageRenderer<'_> {
    /// Look a note up by path slug and render its page.
    ///
    /// An unknown slug fails with `SiteError::DocumentNotFound`; no page is
    /// produced for it.
    pub fn render_note(&self, store: &NoteStore, slug: &str) -> Result<String> {
        let doc = store.get(slug)?;
        self.render_document(doc)
    }

    /// Render the page for an already resolved note
    pub fn render_document(&self, doc: &Document) -> Result<String> {
        let mut context = self.base_context(&doc.title, &doc.slug);
        context.insert("note_title", &doc.title);
        context.insert(
            "note_date",
            &doc.date.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        context.insert("note_html", &doc.html);
        context.insert("notes_credit", &self.config.notes_credit);
        context.insert("listing_href", &self.href(NOTES_LISTING));
        self.templates.render("note.html", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::nav_hrefs;
    use crate::config::SiteConfig;
    use crate::content::{test_document, MarkdownRenderer, NoteStore};
    use crate::error::SiteError;
    use crate::pages::PageRenderer;
    use crate::templates::TemplateRenderer;

    fn store() -> NoteStore {
        let mut store = NoteStore::new();
        store
            .insert(test_document(
                "/basics",
                "<h1>Python Basics</h1>\n<p>Everything is an <code>object</code> &amp; more.</p>\n",
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_note_fragment_is_embedded_verbatim() {
        let mut config = SiteConfig::default();
        config.title = "CIS 192: Python Programming".to_string();
        config.notes_credit = "These notes were written by Arun Kirubarajan.".to_string();
        let templates = TemplateRenderer::new().unwrap();
        let markdown = MarkdownRenderer::new();
        let renderer = PageRenderer::new(&config, &templates, &markdown);

        let store = store();
        let html = renderer.render_note(&store, "basics").unwrap();
        let fragment = store.get("/basics").unwrap().html.as_str();

        assert!(html.contains(fragment));
        assert!(html.contains(r#"<div class="generated">"#));
        assert!(html.contains(r#"<a href="/"><span class="tag is-link is-light is-small">CIS 192: Python Programming</span></a>"#));
        assert!(html.contains(r#"<a href="/lectures"><span class="tag is-link is-light is-medium">All Material</span></a>"#));
        assert!(html.contains("These notes were written by Arun Kirubarajan."));
        assert_eq!(nav_hrefs(&html), vec!["/", "/schedule", "/assignments"]);
    }

    #[test]
    fn test_unknown_note_is_not_found() {
        let config = SiteConfig::default();
        let templates = TemplateRenderer::new().unwrap();
        let markdown = MarkdownRenderer::new();
        let renderer = PageRenderer::new(&config, &templates, &markdown);
        let store = store();

        // Same answer every time, and never a half-rendered page
        for _ in 0..3 {
            let err = renderer.render_note(&store, "/lightning").unwrap_err();
            match err.downcast_ref::<SiteError>() {
                Some(SiteError::DocumentNotFound { slug }) => assert_eq!(slug, "/lightning"),
                other => panic!("expected DocumentNotFound, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_note_links_respect_root() {
        let mut config = SiteConfig::default();
        config.root = "/cis192/".to_string();
        let templates = TemplateRenderer::new().unwrap();
        let markdown = MarkdownRenderer::new();
        let renderer = PageRenderer::new(&config, &templates, &markdown);

        let html = renderer.render_note(&store(), "/basics").unwrap();
        assert!(html.contains(r#"<a href="/cis192/lectures">"#));
        assert!(html.contains(r#"<a href="/cis192/">"#));
    }
}
