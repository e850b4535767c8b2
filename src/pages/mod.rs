//! Course pages - navigation, static page renderers and the note binder

mod data;
mod notes;

pub use data::{
    load_data, AssignmentsData, PanelGroup, SiteData, StaffData, SyllabusData, TablePageData,
    TableSection,
};

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::MarkdownRenderer;
use crate::helpers::{full_url_for, normalize_slug, url_for, TrustedHtml};
use crate::records::{render_panel, render_staff_cards, render_table};
use crate::templates::{ConfigData, NavItem, SectionData, TemplateRenderer};

/// A fixed navigation destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

/// The navigation shown at the top of every page
pub const NAV_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Syllabus",
        path: "/",
    },
    NavLink {
        label: "Lectures",
        path: "/schedule",
    },
    NavLink {
        label: "Assignments",
        path: "/assignments",
    },
];

/// Lecture notes link back to this listing
pub const NOTES_LISTING: &str = "/lectures";

/// The pages every site has, independent of its notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    Syllabus,
    Schedule,
    Lectures,
    Assignments,
    Staff,
    NotFound,
}

impl StaticPage {
    pub const ALL: [StaticPage; 6] = [
        StaticPage::Syllabus,
        StaticPage::Schedule,
        StaticPage::Lectures,
        StaticPage::Assignments,
        StaticPage::Staff,
        StaticPage::NotFound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StaticPage::Syllabus => "syllabus",
            StaticPage::Schedule => "schedule",
            StaticPage::Lectures => "lectures",
            StaticPage::Assignments => "assignments",
            StaticPage::Staff => "staff",
            StaticPage::NotFound => "404",
        }
    }

    /// Site-relative route
    pub fn route(self) -> &'static str {
        match self {
            StaticPage::Syllabus => "/",
            StaticPage::Schedule => "/schedule",
            StaticPage::Lectures => "/lectures",
            StaticPage::Assignments => "/assignments",
            StaticPage::Staff => "/staff",
            StaticPage::NotFound => "/404.html",
        }
    }

    /// Output file, relative to the public directory
    pub fn output_file(self) -> &'static str {
        match self {
            StaticPage::Syllabus => "index.html",
            StaticPage::Schedule => "schedule/index.html",
            StaticPage::Lectures => "lectures/index.html",
            StaticPage::Assignments => "assignments/index.html",
            StaticPage::Staff => "staff/index.html",
            StaticPage::NotFound => "404.html",
        }
    }

    /// Data file, relative to the data directory
    pub fn data_file(self) -> Option<&'static str> {
        match self {
            StaticPage::Syllabus => Some("syllabus.yml"),
            StaticPage::Schedule => Some("schedule.yml"),
            StaticPage::Lectures => Some("lectures.yml"),
            StaticPage::Assignments => Some("assignments.yml"),
            StaticPage::Staff => Some("staff.yml"),
            StaticPage::NotFound => None,
        }
    }
}

/// Navigation items with the current page marked
pub fn nav_items(config: &SiteConfig, current_path: &str) -> Vec<NavItem> {
    let current = normalize_slug(current_path);
    NAV_LINKS
        .iter()
        .map(|link| NavItem {
            label: link.label.to_string(),
            href: TrustedHtml::escape(&url_for(config, link.path)),
            active: normalize_slug(link.path) == current,
        })
        .collect()
}

/// Renders pages into complete HTML documents
pub struct PageRenderer<'a> {
    config: &'a SiteConfig,
    templates: &'a TemplateRenderer,
    markdown: &'a MarkdownRenderer,
    generated_at: String,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        config: &'a SiteConfig,
        templates: &'a TemplateRenderer,
        markdown: &'a MarkdownRenderer,
    ) -> Self {
        let generated_at = match config.tz() {
            Some(tz) => chrono::Utc::now()
                .with_timezone(&tz)
                .format("%B %-d, %Y %H:%M %Z")
                .to_string(),
            None => chrono::Local::now().format("%B %-d, %Y %H:%M").to_string(),
        };

        Self {
            config,
            templates,
            markdown,
            generated_at,
        }
    }

    /// Context every template needs
    fn base_context(&self, page_title: &str, current_path: &str) -> Context {
        let config_data = ConfigData {
            title: self.config.title.clone(),
            subtitle: self.config.subtitle.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            language: self.config.language.clone(),
            url: self.config.url.clone(),
            root: self.config.root.clone(),
        };
        let stylesheets: Vec<TrustedHtml> = self
            .config
            .stylesheets
            .iter()
            .map(|href| TrustedHtml::escape(&url_for(self.config, href)))
            .collect();

        let mut context = Context::new();
        context.insert("config", &config_data);
        context.insert("nav", &nav_items(self.config, current_path));
        context.insert("stylesheets", &stylesheets);
        context.insert("page_title", page_title);
        context.insert("current_path", current_path);
        context.insert("generated_at", &self.generated_at);
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context.insert("index_href", &self.href("/"));
        context.insert(
            "canonical",
            &TrustedHtml::escape(&full_url_for(self.config, current_path)),
        );
        context
    }

    /// A site-relative link target, escaped for an attribute value
    fn href(&self, path: &str) -> TrustedHtml {
        TrustedHtml::escape(&url_for(self.config, path))
    }

    /// Render Markdown from a data file; empty input gives an empty fragment
    fn markdown(&self, source: &str, origin: &str) -> Result<TrustedHtml> {
        if source.trim().is_empty() {
            return Ok(TrustedHtml::new());
        }
        self.markdown.render(source, origin)
    }

    /// Render one of the static pages from its own data
    pub fn render_page(&self, page: StaticPage, data: &SiteData) -> Result<String> {
        match page {
            StaticPage::Syllabus => self.render_syllabus(&data.syllabus),
            StaticPage::Schedule => self.render_tables(page, &data.schedule),
            StaticPage::Lectures => self.render_tables(page, &data.lectures),
            StaticPage::Assignments => self.render_assignments(&data.assignments),
            StaticPage::Staff => self.render_staff(&data.staff),
            StaticPage::NotFound => self.render_not_found(None),
        }
    }

    pub fn render_syllabus(&self, data: &SyllabusData) -> Result<String> {
        let heading = data.heading.as_deref().unwrap_or(&self.config.title);
        let subtitle = data
            .subtitle
            .as_deref()
            .unwrap_or(&self.config.subtitle);

        let facts: Vec<_> = data
            .facts
            .iter()
            .map(|fact| {
                serde_json::json!({
                    "label": fact.get("label").unwrap_or_default(),
                    "value": fact.get("value").unwrap_or_default(),
                })
            })
            .collect();

        let mut context = self.base_context("", StaticPage::Syllabus.route());
        context.insert("heading", heading);
        context.insert("subtitle", subtitle);
        context.insert("facts", &facts);
        context.insert("body", &self.markdown(&data.body, "_data/syllabus.yml")?);
        self.templates.render("syllabus.html", &context)
    }

    pub fn render_tables(&self, page: StaticPage, data: &TablePageData) -> Result<String> {
        let origin = format!("_data/{}", page.data_file().unwrap_or_default());

        let sections = data
            .sections
            .iter()
            .map(|section| {
                Ok(SectionData {
                    heading: section.heading.clone(),
                    intro: self.markdown(&section.intro, &origin)?,
                    body: render_table(self.config, &section.columns, &section.records),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut context = self.base_context(&data.heading, page.route());
        context.insert("heading", &data.heading);
        context.insert("intro", &self.markdown(&data.intro, &origin)?);
        context.insert("sections", &sections);
        self.templates.render("tables.html", &context)
    }

    pub fn render_assignments(&self, data: &AssignmentsData) -> Result<String> {
        let sections: Vec<_> = data
            .groups
            .iter()
            .map(|group| SectionData {
                heading: Some(group.heading.clone()).filter(|h| !h.is_empty()),
                intro: TrustedHtml::new(),
                body: render_panel(self.config, &group.items),
            })
            .collect();

        let mut context = self.base_context(&data.heading, StaticPage::Assignments.route());
        context.insert("heading", &data.heading);
        context.insert(
            "intro",
            &self.markdown(&data.intro, "_data/assignments.yml")?,
        );
        context.insert("sections", &sections);
        self.templates.render("assignments.html", &context)
    }

    pub fn render_staff(&self, data: &StaffData) -> Result<String> {
        let mut context = self.base_context(&data.heading, StaticPage::Staff.route());
        context.insert("heading", &data.heading);
        context.insert("intro", &self.markdown(&data.intro, "_data/staff.yml")?);
        context.insert("members", &render_staff_cards(self.config, &data.members));
        self.templates.render("staff.html", &context)
    }

    /// The fallback page for routes with nothing published
    pub fn render_not_found(&self, missing: Option<&str>) -> Result<String> {
        let mut context = self.base_context("404", StaticPage::NotFound.route());
        context.insert("missing", &missing);
        self.templates.render("404.html", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Column, ContentRecord};

    struct Fixture {
        config: SiteConfig,
        templates: TemplateRenderer,
        markdown: MarkdownRenderer,
    }

    impl Fixture {
        fn new() -> Self {
            let mut config = SiteConfig::default();
            config.title = "CIS 192: Python Programming".to_string();
            config.subtitle = "Spring 2020".to_string();
            Self {
                config,
                templates: TemplateRenderer::new().unwrap(),
                markdown: MarkdownRenderer::new(),
            }
        }

        fn renderer(&self) -> PageRenderer<'_> {
            PageRenderer::new(&self.config, &self.templates, &self.markdown)
        }
    }

    /// `href`s inside the `<nav>` element, in order
    pub(crate) fn nav_hrefs(html: &str) -> Vec<String> {
        let start = html.find("<nav>").unwrap();
        let end = html.find("</nav>").unwrap();
        html[start..end]
            .split("href=\"")
            .skip(1)
            .map(|rest| rest[..rest.find('"').unwrap()].to_string())
            .collect()
    }

    #[test]
    fn test_nav_is_fixed_on_every_page() {
        let fixture = Fixture::new();
        let renderer = fixture.renderer();
        let mut data = SiteData::default();
        data.staff.members.push(ContentRecord::new().with("name", "TA"));

        for page in StaticPage::ALL {
            let html = renderer.render_page(page, &data).unwrap();
            assert_eq!(
                nav_hrefs(&html),
                vec!["/", "/schedule", "/assignments"],
                "page {}",
                page.name()
            );
        }
    }

    #[test]
    fn test_nav_marks_current_page() {
        let config = SiteConfig::default();
        let items = nav_items(&config, "/schedule/");
        assert!(!items[0].active);
        assert!(items[1].active);
        assert!(!items[2].active);
    }

    #[test]
    fn test_nav_respects_root() {
        let mut config = SiteConfig::default();
        config.root = "/cis192/".to_string();
        let hrefs: Vec<_> = nav_items(&config, "/")
            .into_iter()
            .map(|i| i.href.into_string())
            .collect();
        assert_eq!(hrefs, vec!["/cis192/", "/cis192/schedule", "/cis192/assignments"]);
    }

    #[test]
    fn test_syllabus_defaults_to_site_title() {
        let fixture = Fixture::new();
        let mut data = SyllabusData::default();
        data.facts.push(
            ContentRecord::new()
                .with("label", "Location")
                .with("value", "Thursdays at 12:00 PM in Towne 303"),
        );
        data.body = "**Grading**: six assignments.".to_string();

        let html = fixture.renderer().render_syllabus(&data).unwrap();
        assert!(html.contains(r#"<h1 class="title">CIS 192: Python Programming</h1>"#));
        assert!(html.contains(r#"<h1 class="subtitle">Spring 2020</h1>"#));
        assert!(html.contains("<strong>Location: </strong> Thursdays at 12:00 PM in Towne 303"));
        assert!(html.contains("<strong>Grading</strong>: six assignments."));
    }

    #[test]
    fn test_schedule_rows_in_declaration_order() {
        let fixture = Fixture::new();
        let data = TablePageData {
            heading: "Lectures".to_string(),
            intro: "Schedule is subject to change.".to_string(),
            sections: vec![TableSection {
                columns: vec![
                    Column::field("Week", "week"),
                    Column::field("Topics", "topics").linked("notes"),
                ],
                records: vec![
                    ContentRecord::new()
                        .with("week", "0")
                        .with("topics", "Python Basics")
                        .with("notes", "/basics"),
                    ContentRecord::new()
                        .with("week", "1")
                        .with("topics", "Algorithms")
                        .with("notes", "/algorithms"),
                ],
                ..Default::default()
            }],
        };

        let html = fixture
            .renderer()
            .render_tables(StaticPage::Schedule, &data)
            .unwrap();
        let first = html.find("Python Basics").unwrap();
        let second = html.find("Algorithms").unwrap();
        assert!(first < second);
        assert!(html.contains("<p>Schedule is subject to change.</p>"));
        // Table markup is not escaped a second time by the template
        assert!(html.contains(r#"<a href="/basics">Python Basics</a>"#));
    }

    #[test]
    fn test_record_text_is_escaped() {
        let fixture = Fixture::new();
        let mut data = AssignmentsData::default();
        data.groups.push(PanelGroup {
            heading: "<Final Project>".to_string(),
            items: vec![ContentRecord::new().with("title", "Milestone <1>")],
        });
        let html = fixture.renderer().render_assignments(&data).unwrap();
        assert!(html.contains("<strong>&lt;Final Project&gt;</strong>"));
        assert!(html.contains("Milestone &lt;1&gt;"));
        assert!(!html.contains("Milestone <1>"));
    }

    #[test]
    fn test_not_found_page() {
        let fixture = Fixture::new();
        let html = fixture
            .renderer()
            .render_not_found(Some("/lightning"))
            .unwrap();
        assert!(html.contains(r#"<h1 class="title">404!</h1>"#));
        assert!(html.contains("This page isn't ready yet!"));
        assert!(html.contains(r#"<a href="/">Let's go back to the working parts of this website.</a>"#));
        assert!(html.contains("lightning</code>"));
    }
}
