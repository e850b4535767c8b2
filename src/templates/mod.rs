//! Built-in course templates using the Tera template engine
//!
//! Templates are embedded in the binary. Auto-escaping stays on for every
//! `.html` template: only `TrustedHtml` values are passed through `safe`.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::TrustedHtml;

/// Template renderer with the embedded course theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all course templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("course/layout.html")),
            ("syllabus.html", include_str!("course/syllabus.html")),
            ("tables.html", include_str!("course/tables.html")),
            ("assignments.html", include_str!("course/assignments.html")),
            ("staff.html", include_str!("course/staff.html")),
            ("note.html", include_str!("course/note.html")),
            ("404.html", include_str!("course/404.html")),
            // Partials
            ("partials/nav.html", include_str!("course/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("course/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a `YYYY-MM-DD` date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    // "LL" -> "January 16, 2020"
    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %-d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: TrustedHtml,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: Option<String>,
    pub intro: TrustedHtml,
    pub body: TrustedHtml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_date_format_filter() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), tera::Value::String("LL".to_string()));
        let out = date_format_filter(&tera::Value::String("2020-01-16".to_string()), &args).unwrap();
        assert_eq!(out, tera::Value::String("January 16, 2020".to_string()));

        let out = date_format_filter(&tera::Value::String("2020-01-16".to_string()), &HashMap::new())
            .unwrap();
        assert_eq!(out, tera::Value::String("2020-01-16".to_string()));
    }
}
