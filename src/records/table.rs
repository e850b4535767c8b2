//! Record table rendering
//!
//! A table is an ordered list of columns applied to an ordered list of
//! records. Rows come out in record order and cells in column order; nothing
//! is sorted, filtered or validated. A field a record lacks renders as an
//! empty cell.

use serde::{Deserialize, Serialize};

use super::ContentRecord;
use crate::config::SiteConfig;
use crate::helpers::{link_to, TrustedHtml};

/// One rendered row: cell texts in column order
pub type Row = Vec<String>;

/// A column label and how to read its cell from a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    /// Record field holding the cell text
    #[serde(default)]
    pub field: Option<String>,
    /// Prepended to the field value when the field is present
    #[serde(default)]
    pub prefix: String,
    /// Constant cell text, used instead of `field`
    #[serde(default)]
    pub text: Option<String>,
    /// Record field holding the cell's link target
    #[serde(default)]
    pub link: Option<String>,
}

/// A cell after reading a record through its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub href: Option<String>,
}

impl Column {
    /// Column showing a record field
    pub fn field(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: Some(field.into()),
            prefix: String::new(),
            text: None,
            link: None,
        }
    }

    /// Column showing the same text on every row
    pub fn constant(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: None,
            prefix: String::new(),
            text: Some(text.into()),
            link: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Hyperlink the cell to the value of `field`
    pub fn linked(mut self, field: impl Into<String>) -> Self {
        self.link = Some(field.into());
        self
    }

    /// Read this column's cell from a record
    pub fn cell(&self, record: &ContentRecord) -> Cell {
        let text = match (&self.text, &self.field) {
            (Some(text), _) => text.clone(),
            (None, Some(field)) => match record.get(field) {
                Some(value) => format!("{}{}", self.prefix, value),
                None => String::new(),
            },
            (None, None) => String::new(),
        };

        let href = self
            .link
            .as_deref()
            .and_then(|field| record.get_non_empty(field))
            .map(str::to_string);

        Cell { text, href }
    }
}

/// Extract the cell texts of every record, in record order then column order
pub fn render_rows(records: &[ContentRecord], columns: &[Column]) -> Vec<Row> {
    records
        .iter()
        .map(|record| columns.iter().map(|c| c.cell(record).text).collect())
        .collect()
}

/// Render records as a bordered table
pub fn render_table(
    config: &SiteConfig,
    columns: &[Column],
    records: &[ContentRecord],
) -> TrustedHtml {
    let head: TrustedHtml = columns
        .iter()
        .map(|c| {
            let label = TrustedHtml::escape(&c.label);
            let abbr = TrustedHtml::element("abbr", &[("title", &c.label)], &label);
            TrustedHtml::element("th", &[], &abbr)
        })
        .collect();
    let head = TrustedHtml::element("thead", &[], &TrustedHtml::element("tr", &[], &head));

    let body: TrustedHtml = records
        .iter()
        .map(|record| {
            let cells: TrustedHtml = columns
                .iter()
                .map(|column| {
                    let cell = column.cell(record);
                    let text = TrustedHtml::escape(&cell.text);
                    let inner = match (&cell.href, cell.text.is_empty()) {
                        (Some(href), false) => link_to(config, href, &text),
                        _ => text,
                    };
                    TrustedHtml::element("td", &[], &inner)
                })
                .collect();
            TrustedHtml::element("tr", &[], &cells)
        })
        .collect();
    let body = TrustedHtml::element("tbody", &[], &body);

    let mut inner = head;
    inner.push(&body);
    TrustedHtml::element(
        "table",
        &[("class", "table is-bordered is-fullwidth")],
        &inner,
    )
}

/// Link targets referenced by the records through linked columns, in order
pub fn table_links<'a>(
    columns: &'a [Column],
    records: &'a [ContentRecord],
) -> impl Iterator<Item = &'a str> + 'a {
    records.iter().flat_map(move |record| {
        columns.iter().filter_map(move |column| {
            column
                .link
                .as_deref()
                .and_then(|field| record.get_non_empty(field))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lectures() -> Vec<ContentRecord> {
        vec![
            ContentRecord::new()
                .with("week", "0")
                .with("topics", "Python Basics")
                .with("notes", "/basics")
                .with("hw", "HW0")
                .with("hw_link", "https://example.com/assignment0.py"),
            ContentRecord::new()
                .with("week", "1")
                .with("topics", "Algorithms")
                .with("notes", "/algorithms"),
        ]
    }

    #[test]
    fn test_rows_follow_record_and_column_order() {
        let columns = vec![Column::field("Week", "week"), Column::field("Topics", "topics")];
        let rows = render_rows(&lectures(), &columns);
        assert_eq!(
            rows,
            vec![
                vec!["0".to_string(), "Python Basics".to_string()],
                vec!["1".to_string(), "Algorithms".to_string()],
            ]
        );
    }

    #[test]
    fn test_empty_sequence_has_no_rows() {
        let columns = vec![Column::field("Week", "week")];
        assert!(render_rows(&[], &columns).is_empty());
    }

    #[test]
    fn test_row_count_matches_records() {
        let records: Vec<_> = (0..13)
            .map(|i| ContentRecord::new().with("week", i.to_string()))
            .collect();
        let columns = vec![Column::field("Week", "week"), Column::field("Date", "date")];
        let rows = render_rows(&records, &columns);
        assert_eq!(rows.len(), 13);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0], i.to_string());
            // Missing field renders empty
            assert_eq!(row[1], "");
        }
    }

    #[test]
    fn test_prefix_and_constant_cells() {
        let columns = vec![
            Column::field("Week", "week").with_prefix("Week "),
            Column::constant("Resources", "Notes").linked("notes"),
        ];
        let record = ContentRecord::new().with("week", "4").with("notes", "/ml");
        assert_eq!(
            columns[0].cell(&record),
            Cell {
                text: "Week 4".to_string(),
                href: None
            }
        );
        assert_eq!(
            columns[1].cell(&record),
            Cell {
                text: "Notes".to_string(),
                href: Some("/ml".to_string())
            }
        );
        // Prefix is not applied to a missing field
        assert_eq!(columns[0].cell(&ContentRecord::new()).text, "");
    }

    #[test]
    fn test_render_table_markup() {
        let config = SiteConfig::default();
        let columns = vec![
            Column::field("Week", "week"),
            Column::field("Topics", "topics").linked("notes"),
            Column::field("Homework", "hw").linked("hw_link"),
        ];
        let html = render_table(&config, &columns, &lectures());
        let html = html.as_str();

        assert!(html.starts_with(r#"<table class="table is-bordered is-fullwidth">"#));
        assert!(html.contains(r#"<th><abbr title="Homework">Homework</abbr></th>"#));
        assert!(html.contains(r#"<td><a href="/basics">Python Basics</a></td>"#));
        assert!(html.contains(
            r#"<td><a href="https://example.com/assignment0.py" target="_blank" rel="noopener">HW0</a></td>"#
        ));
        // Second lecture has no homework: empty cell, no dangling anchor
        assert!(html.contains(r#"<td><a href="/algorithms">Algorithms</a></td><td></td></tr>"#));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_render_table_escapes_text() {
        let config = SiteConfig::default();
        let columns = vec![Column::field("Topics", "topics")];
        let records = vec![ContentRecord::new().with("topics", "<b>Django</b> & SQL")];
        let html = render_table(&config, &columns, &records);
        assert!(html
            .as_str()
            .contains("<td>&lt;b&gt;Django&lt;/b&gt; &amp; SQL</td>"));
    }

    #[test]
    fn test_table_links() {
        let columns = vec![
            Column::field("Topics", "topics").linked("notes"),
            Column::field("Homework", "hw").linked("hw_link"),
        ];
        let records = lectures();
        let links: Vec<_> = table_links(&columns, &records).collect();
        assert_eq!(
            links,
            vec!["/basics", "https://example.com/assignment0.py", "/algorithms"]
        );
    }

    #[test]
    fn test_column_from_yaml() {
        let yaml = r#"
- label: Week
  field: week
  prefix: "Week "
- label: Resources
  text: Notes
  link: notes
"#;
        let columns: Vec<Column> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(columns[0], Column::field("Week", "week").with_prefix("Week "));
        assert_eq!(columns[1], Column::constant("Resources", "Notes").linked("notes"));
    }
}
