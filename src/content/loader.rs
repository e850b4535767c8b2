//! Content loader - loads lecture notes from the notes directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Document, FrontMatter, MarkdownRenderer, NoteStore};
use crate::error::SiteError;
use crate::helpers::{is_safe_slug, normalize_slug};
use crate::Course;

/// Loads and renders lecture notes
pub struct NoteLoader<'a> {
    course: &'a Course,
    renderer: MarkdownRenderer,
}

impl<'a> NoteLoader<'a> {
    /// Create a new note loader
    pub fn new(course: &'a Course) -> Self {
        let renderer = MarkdownRenderer::with_options(&course.config.highlight);
        Self { course, renderer }
    }

    /// The renderer, for Markdown held in page data files
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load every note under the notes directory.
    ///
    /// Files are visited in path order. A note that cannot be read or
    /// rendered is skipped with a warning; two notes with the same path
    /// slug are an error.
    pub fn load_notes(&self) -> Result<NoteStore> {
        let mut store = NoteStore::new();
        let notes_dir = &self.course.notes_dir;
        if !notes_dir.exists() {
            tracing::debug!("No notes directory at {:?}", notes_dir);
            return Ok(store);
        }

        for entry in WalkDir::new(notes_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            match self.load_note(path) {
                Ok(doc) => {
                    tracing::debug!("Loaded note {} from {:?}", doc.slug, path);
                    store.insert(doc)?;
                }
                Err(e) => {
                    tracing::warn!("Failed to load note {:?}: {:#}", path, e);
                }
            }
        }

        Ok(store)
    }

    /// Load a single note from a file
    pub fn load_note(&self, path: &Path) -> Result<Document> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| SiteError::FrontMatter {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let slug = normalize_slug(fm.path.as_deref().unwrap_or(stem));
        if !is_safe_slug(&slug) {
            return Err(SiteError::UnsafeSlug {
                slug,
                note: path.to_path_buf(),
            }
            .into());
        }
        let title = fm.title.clone().unwrap_or_else(|| stem.to_string());
        let date = fm.parse_date();

        let source = path
            .strip_prefix(&self.course.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let html = self.renderer.render(body, &slug)?;

        Ok(Document {
            slug,
            title,
            date,
            html,
            raw: body.to_string(),
            source,
            full_source: path.to_path_buf(),
        })
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
