//! Generator module - writes the course site into the public directory

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::content::{loader::is_markdown_file, MarkdownRenderer, NoteStore};
use crate::error::SiteError;
use crate::helpers::{is_external, is_safe_slug, normalize_slug};
use crate::pages::{PageRenderer, SiteData, StaticPage};
use crate::templates::TemplateRenderer;
use crate::Course;

/// What a route is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    Page(StaticPage),
    Note,
    Asset,
}

/// A published route and the file that backs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    /// Relative to the public directory
    pub output: PathBuf,
    pub kind: RouteKind,
}

/// A site-relative link on a course page with nothing published behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub page: StaticPage,
    pub target: String,
}

/// Summary of one generation run
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: usize,
    pub notes: usize,
    pub assets: usize,
    pub dangling: Vec<DanglingLink>,
}

/// Static site generator using the built-in course templates
pub struct Generator<'a> {
    course: &'a Course,
    templates: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(course: &'a Course) -> Result<Self> {
        let templates = TemplateRenderer::new()?;
        Ok(Self { course, templates })
    }

    /// Generate the entire site
    pub fn generate(
        &self,
        store: &NoteStore,
        data: &SiteData,
        markdown: &MarkdownRenderer,
    ) -> Result<BuildReport> {
        check_route_conflicts(store)?;

        let public_dir = &self.course.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = BuildReport {
            assets: self.copy_source_assets()?,
            ..Default::default()
        };

        let renderer = PageRenderer::new(&self.course.config, &self.templates, markdown);

        for page in StaticPage::ALL {
            let html = renderer
                .render_page(page, data)
                .with_context(|| format!("rendering the {} page", page.name()))?;
            write_page(&public_dir.join(page.output_file()), &html)?;
            tracing::debug!("Generated {}", page.output_file());
            report.pages += 1;
        }

        for doc in store.iter() {
            let html = renderer
                .render_document(doc)
                .with_context(|| format!("rendering note {}", doc.slug))?;
            write_page(&public_dir.join(note_output_file(&doc.slug)), &html)?;
            tracing::debug!("Generated note {}", doc.slug);
            report.notes += 1;
        }

        report.dangling = self.dangling_links(store, data);
        for link in &report.dangling {
            tracing::warn!(
                "The {} page links to {}, which has no page; it will show the 404 page",
                link.page.name(),
                link.target
            );
        }

        Ok(report)
    }

    /// Site-relative record links that resolve to neither a page, a note nor a file
    pub fn dangling_links(&self, store: &NoteStore, data: &SiteData) -> Vec<DanglingLink> {
        let known: HashSet<String> = StaticPage::ALL
            .iter()
            .map(|page| normalize_slug(page.route()))
            .collect();

        data.links()
            .into_iter()
            .filter(|(_, target)| !is_external(target) && target.starts_with('/'))
            .filter(|(_, target)| {
                let path = strip_query(target);
                let slug = normalize_slug(path);
                !known.contains(&slug)
                    && !store.contains(&slug)
                    && !self.course.source_dir.join(path.trim_start_matches('/')).is_file()
            })
            .map(|(page, target)| DanglingLink {
                page,
                target: target.to_string(),
            })
            .collect()
    }

    /// Copy everything in the source directory that is not a note or data file
    fn copy_source_assets(&self) -> Result<usize> {
        let source_dir = &self.course.source_dir;
        if !source_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            if is_hidden_source(relative) {
                continue;
            }

            let dest = self.course.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("copying {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Output file for a note, relative to the public directory
pub fn note_output_file(slug: &str) -> PathBuf {
    let slug = normalize_slug(slug);
    Path::new(slug.trim_start_matches('/')).join("index.html")
}

/// Every route the site publishes: course pages, then notes, then assets
pub fn routes(course: &Course, store: &NoteStore) -> Vec<Route> {
    let mut routes: Vec<Route> = StaticPage::ALL
        .iter()
        .map(|&page| Route {
            path: page.route().to_string(),
            output: PathBuf::from(page.output_file()),
            kind: RouteKind::Page(page),
        })
        .collect();

    routes.extend(store.iter().map(|doc| Route {
        path: doc.slug.clone(),
        output: note_output_file(&doc.slug),
        kind: RouteKind::Note,
    }));

    if course.source_dir.exists() {
        let mut assets: Vec<Route> = WalkDir::new(&course.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && !is_markdown_file(e.path()))
            .filter_map(|e| {
                let relative = e.path().strip_prefix(&course.source_dir).ok()?;
                if is_hidden_source(relative) {
                    return None;
                }
                let path = relative.to_string_lossy().replace('\\', "/");
                Some(Route {
                    path: format!("/{}", path),
                    output: relative.to_path_buf(),
                    kind: RouteKind::Asset,
                })
            })
            .collect();
        routes.append(&mut assets);
    }

    routes
}

/// Notes may not take over a course page's route or leave the public directory
fn check_route_conflicts(store: &NoteStore) -> Result<(), SiteError> {
    for doc in store.iter() {
        if !is_safe_slug(&doc.slug) {
            return Err(SiteError::UnsafeSlug {
                slug: doc.slug.clone(),
                note: doc.full_source.clone(),
            });
        }

        let taken = StaticPage::ALL
            .iter()
            .any(|page| normalize_slug(page.route()) == doc.slug);
        if taken {
            return Err(SiteError::RouteConflict {
                slug: doc.slug.clone(),
                note: doc.full_source.clone(),
            });
        }
    }
    Ok(())
}

/// Directories starting with `_` (notes, data) and dotfiles are not published
fn is_hidden_source(relative: &Path) -> bool {
    relative.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('_') || name.starts_with('.')
    })
}

fn strip_query(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))
}
