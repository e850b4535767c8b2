//! Lecture notes and the store they are looked up in

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::path::PathBuf;

use crate::error::SiteError;
use crate::helpers::{normalize_slug, TrustedHtml};

/// A rendered lecture note
#[derive(Debug, Clone)]
pub struct Document {
    /// Normalized path slug, e.g. `/basics`
    pub slug: String,

    /// Note title
    pub title: String,

    /// Date from front-matter, if any
    pub date: Option<DateTime<Local>>,

    /// Rendered HTML body
    pub html: TrustedHtml,

    /// Raw markdown body (front-matter removed)
    pub raw: String,

    /// Source file path (relative to the source directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,
}

/// Rendered notes keyed by path slug, in load order
#[derive(Debug, Default)]
pub struct NoteStore {
    docs: IndexMap<String, Document>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note; two notes may not share a slug
    pub fn insert(&mut self, doc: Document) -> Result<(), SiteError> {
        if let Some(existing) = self.docs.get(&doc.slug) {
            return Err(SiteError::DuplicateSlug {
                slug: doc.slug.clone(),
                first: existing.full_source.clone(),
                second: doc.full_source,
            });
        }
        self.docs.insert(doc.slug.clone(), doc);
        Ok(())
    }

    /// Look a note up by slug (`basics`, `/basics` and `/basics/` are equal)
    pub fn get(&self, slug: &str) -> Result<&Document, SiteError> {
        let key = normalize_slug(slug);
        self.docs
            .get(&key)
            .ok_or(SiteError::DocumentNotFound { slug: key })
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.docs.contains_key(&normalize_slug(slug))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_document(slug: &str, markdown_html: &str) -> Document {
    Document {
        slug: normalize_slug(slug),
        title: slug.trim_matches('/').to_string(),
        date: None,
        html: TrustedHtml::from_markdown(markdown_html.to_string(), slug),
        raw: String::new(),
        source: format!("_notes{}.md", normalize_slug(slug)),
        full_source: PathBuf::from(format!("source/_notes{}.md", normalize_slug(slug))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_normalizes_slug() {
        let mut store = NoteStore::new();
        store.insert(test_document("/basics", "<p>hi</p>")).unwrap();

        assert_eq!(store.get("basics").unwrap().slug, "/basics");
        assert_eq!(store.get("/basics/").unwrap().slug, "/basics");
        assert!(store.contains("/basics"));
    }

    #[test]
    fn test_missing_slug_is_not_found() {
        let store = NoteStore::new();
        for _ in 0..2 {
            match store.get("/nlp") {
                Err(SiteError::DocumentNotFound { slug }) => assert_eq!(slug, "/nlp"),
                other => panic!("expected DocumentNotFound, got {:?}", other.map(|d| &d.slug)),
            }
        }
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut store = NoteStore::new();
        store.insert(test_document("/ml", "<p>a</p>")).unwrap();
        let err = store.insert(test_document("ml/", "<p>b</p>")).unwrap_err();
        assert!(matches!(err, SiteError::DuplicateSlug { ref slug, .. } if slug == "/ml"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_insert_order() {
        let mut store = NoteStore::new();
        for slug in ["/basics", "/algorithms", "/pythonic"] {
            store.insert(test_document(slug, "")).unwrap();
        }
        let slugs: Vec<_> = store.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/basics", "/algorithms", "/pythonic"]);
    }
}
