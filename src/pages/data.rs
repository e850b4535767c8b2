//! Page data files (`source/_data/*.yml`)
//!
//! Every page owns its records: each is loaded from that page's own file and
//! handed to its renderer. Nothing is shared between pages.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::StaticPage;
use crate::error::SiteError;
use crate::records::{card_links, table_links, Column, ContentRecord};
use crate::Course;

/// Landing page: course facts and a Markdown body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllabusData {
    /// Defaults to the site title
    pub heading: Option<String>,
    /// Defaults to the site subtitle
    pub subtitle: Option<String>,
    /// `label` / `value` records, e.g. Instructor, Location
    pub facts: Vec<ContentRecord>,
    /// Markdown
    pub body: String,
}

/// A page made of one or more record tables (schedule, lectures)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePageData {
    pub heading: String,
    /// Markdown
    pub intro: String,
    pub sections: Vec<TableSection>,
}

impl Default for TablePageData {
    fn default() -> Self {
        Self {
            heading: "Lectures".to_string(),
            intro: String::new(),
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSection {
    pub heading: Option<String>,
    /// Markdown
    pub intro: String,
    pub columns: Vec<Column>,
    pub records: Vec<ContentRecord>,
}

/// Assignments grouped into panels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentsData {
    pub heading: String,
    /// Markdown
    pub intro: String,
    pub groups: Vec<PanelGroup>,
}

impl Default for AssignmentsData {
    fn default() -> Self {
        Self {
            heading: "Assignments".to_string(),
            intro: String::new(),
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelGroup {
    pub heading: String,
    /// `title` / `link` / `download` records
    pub items: Vec<ContentRecord>,
}

/// Course staff cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffData {
    pub heading: String,
    /// Markdown
    pub intro: String,
    pub members: Vec<ContentRecord>,
}

impl Default for StaffData {
    fn default() -> Self {
        Self {
            heading: "Staff".to_string(),
            intro: String::new(),
            members: Vec::new(),
        }
    }
}

/// Data for every static page of the site
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub syllabus: SyllabusData,
    pub schedule: TablePageData,
    pub lectures: TablePageData,
    pub assignments: AssignmentsData,
    pub staff: StaffData,
}

impl SiteData {
    /// Load each page's data file from the data directory
    pub fn load(course: &Course) -> Result<Self, SiteError> {
        let dir = &course.data_dir;
        Ok(Self {
            syllabus: load_page(dir, StaticPage::Syllabus)?,
            schedule: load_page(dir, StaticPage::Schedule)?,
            lectures: load_page(dir, StaticPage::Lectures)?,
            assignments: load_page(dir, StaticPage::Assignments)?,
            staff: load_page(dir, StaticPage::Staff)?,
        })
    }

    /// Every link target the page records point at, with the page it is on
    pub fn links(&self) -> Vec<(StaticPage, &str)> {
        let mut links = Vec::new();
        for (page, data) in [
            (StaticPage::Schedule, &self.schedule),
            (StaticPage::Lectures, &self.lectures),
        ] {
            for section in &data.sections {
                links.extend(
                    table_links(&section.columns, &section.records).map(|link| (page, link)),
                );
            }
        }
        for group in &self.assignments.groups {
            links.extend(card_links(&group.items).map(|link| (StaticPage::Assignments, link)));
        }
        links.extend(card_links(&self.staff.members).map(|link| (StaticPage::Staff, link)));
        links
    }
}

fn load_page<T: DeserializeOwned + Default>(dir: &Path, page: StaticPage) -> Result<T, SiteError> {
    match page.data_file() {
        Some(file) => load_data(&dir.join(file)),
        None => Ok(T::default()),
    }
}

/// Load one data file; a missing file yields the page's defaults
pub fn load_data<T: DeserializeOwned + Default>(path: &Path) -> Result<T, SiteError> {
    if !path.exists() {
        tracing::debug!("No data file at {:?}, using defaults", path);
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&content).map_err(|source| SiteError::DataFile {
        path: path.to_path_buf(),
        source,
    })
}
